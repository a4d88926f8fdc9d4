//! Domain layer: the value types every other layer speaks.
//!
//! Nothing here touches storage, markup or the clock. The visibility rule lives
//! on [`GenreFilter`] so it cannot drift between the controller and its
//! subscribers.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Story card model
//! - [`theme`]: Light/dark theme and the system color-scheme signal
//! - [`filter`]: Genre filter and the visibility rule

pub mod error;
pub mod filter;
pub mod item;
pub mod theme;

pub use error::{Result, StoryshelfError};
pub use filter::GenreFilter;
pub use item::Item;
pub use theme::{ColorScheme, Theme};
