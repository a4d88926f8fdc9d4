//! Storage layer for the persisted theme preference.
//!
//! # Modules
//!
//! - `backend`: [`PreferenceStore`] trait
//! - `json`: JSON file store with atomic writes
//! - `memory`: in-process and always-failing stores
//! - `models`: on-disk record type
//! - `preferences`: the [`Preferences`] façade that turns failures into absence

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;
pub mod preferences;

pub use backend::PreferenceStore;
pub use json::JsonPreferenceStore;
pub use memory::{MemoryPreferenceStore, UnavailableStore};
pub use models::PreferenceRecord;
pub use preferences::Preferences;
