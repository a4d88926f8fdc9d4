//! Infrastructure layer for filesystem and environment lookups.

pub mod paths;

pub use paths::{data_dir, default_preferences_path, expand_tilde};
