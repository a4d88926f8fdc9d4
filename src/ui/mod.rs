//! Document-side state and its terminal rendering.
//!
//! ```text
//! controllers → PageModel ──► host renderer (browser)
//!                   │
//!                   └──────► render() → ANSI output (terminal driver)
//! ```
//!
//! # Modules
//!
//! - [`page`]: [`PageModel`], the attributes controllers maintain
//! - [`live_region`]: accessibility status subscriber
//! - [`renderer`]: ANSI rendering for the terminal driver
//! - [`theme`]: light/dark terminal palettes

pub mod live_region;
pub mod page;
pub mod renderer;
pub mod theme;

pub use live_region::{status_message, LiveRegion};
pub use page::{CardView, DisplayState, PageModel};
pub use renderer::render;
pub use theme::Palette;
