//! Degrading façade over a [`PreferenceStore`].

use crate::storage::backend::PreferenceStore;
use std::fmt;

/// Preference access that never fails.
///
/// Storage being disabled is not an error from the page's point of view: reads
/// report "nothing stored" and writes are dropped, so theme resolution falls
/// back to the system scheme or the default. Failures are logged at debug
/// level only.
pub struct Preferences {
    store: Option<Box<dyn PreferenceStore>>,
}

impl Preferences {
    /// Wraps a concrete store.
    pub fn new(store: impl PreferenceStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    /// Wraps an already boxed store.
    #[must_use]
    pub fn from_boxed(store: Box<dyn PreferenceStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A façade with no backing store at all.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { store: None }
    }

    /// Reads `key`, treating any failure as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyshelf::storage::{Preferences, UnavailableStore};
    ///
    /// let mut prefs = Preferences::new(UnavailableStore);
    /// prefs.set("storyshelf.theme", "dark");
    /// assert_eq!(prefs.get("storyshelf.theme"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let store = self.store.as_ref()?;
        match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "preference read failed, treating as absent");
                None
            }
        }
    }

    /// Writes `key`, dropping the write on failure.
    pub fn set(&mut self, key: &str, value: &str) {
        let Some(store) = self.store.as_mut() else {
            tracing::debug!(key = %key, "no preference store, write dropped");
            return;
        };
        if let Err(e) = store.set(key, value) {
            tracing::debug!(key = %key, error = %e, "preference write failed, ignoring");
        }
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("available", &self.store.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferenceStore;

    #[test]
    fn passes_through_working_store() {
        let mut prefs = Preferences::new(MemoryPreferenceStore::default());
        assert_eq!(prefs.get("k"), None);
        prefs.set("k", "v");
        assert_eq!(prefs.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn no_store_is_silent() {
        let mut prefs = Preferences::unavailable();
        prefs.set("k", "v");
        assert_eq!(prefs.get("k"), None);
    }
}
