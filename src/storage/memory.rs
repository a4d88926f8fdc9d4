//! In-process preference stores.

use crate::domain::error::{Result, StoryshelfError};
use crate::storage::backend::PreferenceStore;
use std::collections::HashMap;

/// Process-local store. Values are lost when it is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    /// Creates a store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A store that always fails, as when storage is disabled by the user agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(StoryshelfError::Storage(format!("storage unavailable reading {key}")))
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(StoryshelfError::Storage(format!("storage unavailable writing {key}")))
    }
}
