//! Error types for the storyshelf controller.
//!
//! This module defines the centralized error type [`StoryshelfError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for storyshelf operations.
///
/// Most variants carry a description of what went wrong. Storage failures are
/// normally absorbed by [`crate::storage::Preferences`] and never reach the user;
/// handler failures are caught by [`crate::app::handle_event`] and surfaced as a
/// generic notification.
///
/// # Examples
///
/// ```
/// use storyshelf::StoryshelfError;
///
/// fn read_config() -> Result<(), StoryshelfError> {
///     Err(StoryshelfError::Config("stagger_ms must be a number".to_string()))
/// }
/// assert!(read_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum StoryshelfError {
    /// Preference storage failed or is unavailable.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The rendered document could not be read at all.
    ///
    /// Individual malformed cards do not produce this error; they are skipped.
    #[error("Markup error: {0}")]
    Markup(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An event handler or subscriber failed.
    #[error("Handler error: {0}")]
    Handler(String),
}

/// A specialized `Result` type for storyshelf operations.
pub type Result<T> = std::result::Result<T, StoryshelfError>;
