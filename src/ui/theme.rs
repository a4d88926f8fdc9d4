//! Terminal palettes for the light and dark themes.
//!
//! The terminal driver has no stylesheet, so the document theme attribute is
//! rendered with a palette chosen from it. Palettes are TOML, built in.
//!
//! # TOML Format
//!
//! ```toml
//! name = "storyshelf-dark"
//!
//! [colors]
//! heading_fg = "#cdd6f4"
//! text_normal = "#bac2de"
//! text_dim = "#6c7086"
//! accent = "#89b4fa"
//! card_hiding = "#585b70"
//! notice_info = "#89dceb"
//! notice_success = "#a6e3a1"
//! notice_error = "#f38ba8"
//! ```

use crate::app::NotificationKind;
use crate::domain::error::{Result, StoryshelfError};
use crate::domain::Theme;
use serde::{Deserialize, Serialize};

/// Named set of colors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Palette {
    pub name: String,
    pub colors: PaletteColors,
}

/// Hex colors (e.g. `"#cdd6f4"`) for each rendered element.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaletteColors {
    pub heading_fg: String,
    pub text_normal: String,
    pub text_dim: String,
    /// Pressed filter control and focus marker.
    pub accent: String,
    /// Cards that are fading out.
    pub card_hiding: String,
    pub notice_info: String,
    pub notice_success: String,
    pub notice_error: String,
}

impl Palette {
    /// Built-in palette for `theme`.
    ///
    /// # Errors
    ///
    /// Returns [`StoryshelfError::Config`] if the built-in TOML fails to parse.
    pub fn for_theme(theme: Theme) -> Result<Self> {
        let source = match theme {
            Theme::Light => include_str!("../../themes/light.toml"),
            Theme::Dark => include_str!("../../themes/dark.toml"),
        };
        Self::from_toml(source)
    }

    /// Parses a palette from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StoryshelfError::Config`] on invalid TOML or missing colors.
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| StoryshelfError::Config(format!("failed to parse palette: {e}")))
    }

    /// Color for a notification banner.
    #[must_use]
    pub fn notice(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::Info => &self.colors.notice_info,
            NotificationKind::Success => &self.colors.notice_success,
            NotificationKind::Error => &self.colors.notice_error,
        }
    }

    /// Converts a hex color to RGB. Malformed input yields white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground escape for a hex color.
    ///
    /// # Example
    ///
    /// ```rust
    /// use storyshelf::ui::Palette;
    ///
    /// assert_eq!(Palette::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn strike() -> &'static str {
        "\u{001b}[9m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}
