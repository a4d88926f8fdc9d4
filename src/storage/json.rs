//! JSON file-based preference store.
//!
//! A small, human-readable store for the handful of values the page persists.
//! Writes go to a temporary file which is then renamed over the target, so a
//! crash never leaves a half-written file behind.

use crate::domain::error::{Result, StoryshelfError};
use crate::storage::backend::PreferenceStore;
use crate::storage::models::PreferenceRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferenceData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Stored values keyed by preference name.
    #[serde(default)]
    preferences: BTreeMap<String, PreferenceRecord>,
}

impl Default for PreferenceData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            preferences: BTreeMap::new(),
        }
    }
}

/// JSON file preference store.
///
/// The whole file is held in memory and rewritten on every `set`.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "preferences": {
///     "storyshelf.theme": { "value": "dark", "updated_at": 1760000000 }
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonPreferenceStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy, loaded on creation.
    data: PreferenceData,
}

impl JsonPreferenceStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store; it is created on the first write. A
    /// file that is not valid JSON is treated the same way and replaced on
    /// the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use storyshelf::storage::JsonPreferenceStore;
    ///
    /// let store = JsonPreferenceStore::open("/tmp/storyshelf/preferences.json")?;
    /// # Ok::<(), storyshelf::StoryshelfError>(())
    /// ```
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON preference store");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = if file_path.exists() {
            match Self::load_from_file(&file_path) {
                Ok(data) => data,
                Err(StoryshelfError::Storage(reason)) => {
                    tracing::warn!(path = ?file_path, reason = %reason, "unreadable preference file, starting empty");
                    PreferenceData::default()
                }
                Err(e) => return Err(e),
            }
        } else {
            tracing::debug!("no preference file yet, starting empty");
            PreferenceData::default()
        };

        tracing::debug!(count = data.preferences.len(), "preference store ready");

        Ok(Self { file_path, data })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<PreferenceData> {
        let contents = std::fs::read_to_string(path)?;
        let data: PreferenceData = serde_json::from_str(&contents)
            .map_err(|e| StoryshelfError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > FORMAT_VERSION {
            tracing::warn!(
                version = data.version,
                supported = FORMAT_VERSION,
                "preference file written by a newer version"
            );
        }

        Ok(data)
    }

    fn save_to_file(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| StoryshelfError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.preferences.get(key).map(|record| record.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set_preference", key = %key).entered();

        let unchanged = self
            .data
            .preferences
            .get(key)
            .is_some_and(|record| record.value == value);
        if unchanged && self.file_path.exists() {
            tracing::trace!("value unchanged, skipping write");
            return Ok(());
        }

        let previous = self
            .data
            .preferences
            .insert(key.to_string(), PreferenceRecord::new(value));

        if let Err(e) = self.save_to_file() {
            // Keep memory and disk in agreement.
            match previous {
                Some(record) => self.data.preferences.insert(key.to_string(), record),
                None => self.data.preferences.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(store.get("storyshelf.theme").unwrap(), None);
        store.set("storyshelf.theme", "dark").unwrap();

        let reopened = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get("storyshelf.theme").unwrap().as_deref(), Some("dark"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = JsonPreferenceStore::open(&path).unwrap();
        store.set("k", "light").unwrap();
        store.set("k", "dark").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let data: PreferenceData = serde_json::from_str(&contents).unwrap();
        assert_eq!(data.version, FORMAT_VERSION);
        assert_eq!(data.preferences["k"].value, "dark");
    }

    #[test]
    fn corrupt_file_starts_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(store.get("storyshelf.theme").unwrap(), None);
        store.set("storyshelf.theme", "dark").unwrap();

        let reopened = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get("storyshelf.theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonPreferenceStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoryshelfError::Io(_)));
    }
}
