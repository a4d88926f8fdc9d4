//! Preference store abstraction.
//!
//! This module defines the [`PreferenceStore`] trait that abstracts over durable
//! key-value backends. The contract is deliberately tiny: one string value per
//! key, no expiry, no encryption.

use crate::domain::error::Result;

/// Abstraction over durable per-profile key-value storage.
///
/// Implementations report failures through [`Result`]; callers that need the
/// "degrade silently" behaviour go through [`crate::storage::Preferences`]
/// instead of using a store directly.
///
/// # Implementations
///
/// - [`JsonPreferenceStore`](crate::storage::JsonPreferenceStore): JSON file with atomic writes
/// - [`MemoryPreferenceStore`](crate::storage::MemoryPreferenceStore): process-local map
/// - [`UnavailableStore`](crate::storage::UnavailableStore): storage disabled by the user agent
///
/// # Examples
///
/// ```
/// use storyshelf::storage::{MemoryPreferenceStore, PreferenceStore};
///
/// let mut store = MemoryPreferenceStore::default();
/// store.set("storyshelf.theme", "dark")?;
/// assert_eq!(store.get("storyshelf.theme")?.as_deref(), Some("dark"));
/// # Ok::<(), storyshelf::StoryshelfError>(())
/// ```
pub trait PreferenceStore {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
