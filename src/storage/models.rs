//! Storage record models for the preference file.

use serde::{Deserialize, Serialize};

/// One stored preference value.
///
/// Unlike the bare string handed back through
/// [`PreferenceStore::get`](crate::storage::PreferenceStore::get), the record
/// keeps the time of the last write for troubleshooting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    /// Stored string value.
    pub value: String,

    /// Unix timestamp of the last write.
    pub updated_at: i64,
}

impl PreferenceRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyshelf::storage::PreferenceRecord;
    ///
    /// let record = PreferenceRecord::new("dark");
    /// assert_eq!(record.value, "dark");
    /// assert!(record.updated_at > 0);
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}
