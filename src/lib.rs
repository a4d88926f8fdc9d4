//! Storyshelf: headless theme and genre-filter controller for short-fiction
//! listing pages.
//!
//! Storyshelf owns the state a listing page script would keep:
//! - Light/dark theme resolved from a stored preference or the OS scheme
//! - Genre filter with staged show/hide transitions
//! - Persisted theme choice with silent degradation when storage is off
//! - Synchronous event bus announcing theme and filter changes
//! - One-time import of story cards from the rendered HTML
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (browser shell, terminal driver in main.rs)   │  ← Events, clock
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling with fault isolation              │
//! │  - Theme / filter controllers                       │
//! │  - Timers, notifications, shortcuts                 │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Events        │
//! │ (ui/)         │   │ (storage/)    │   │ (events/)     │
//! │ - Page model  │   │ - JSON file   │   │ - Event bus   │
//! │ - Live region │   │ - Degrading   │   │ - Analytics   │
//! │ - Rendering   │   │   façade      │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Registry, Domain & Infrastructure                  │
//! │  - HTML import (registry/)                          │
//! │  - Theme, filter, item, errors (domain/)            │
//! │  - Data paths (infrastructure/)                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: controllers, timers and the event handler
//! - [`domain`]: value types and errors
//! - [`events`]: event bus and analytics subscriber
//! - [`infrastructure`]: data directory lookup
//! - [`observability`]: tracing subscriber setup
//! - [`registry`]: story card import from HTML
//! - [`storage`]: preference persistence
//! - [`ui`]: page model, live region and terminal rendering
//!
//! # Example
//!
//! ```rust
//! use storyshelf::storage::{MemoryPreferenceStore, Preferences};
//! use storyshelf::{handle_event, initialize, ColorScheme, Config, Event, GenreFilter};
//!
//! let html = r#"
//!   <article data-story-id="1" data-genres="horror">
//!     <h3 class="story-title">The Lantern</h3><p class="story-synopsis">A light.</p>
//!   </article>
//!   <article data-story-id="2" data-genres="comedy drama">
//!     <h3 class="story-title">Second Act</h3><p class="story-synopsis">Curtain.</p>
//!   </article>"#;
//!
//! let config = Config::default();
//! let prefs = Preferences::new(MemoryPreferenceStore::default());
//! let mut state = initialize(&config, html, prefs, ColorScheme::Light);
//!
//! handle_event(&mut state, &Event::SelectFilter(GenreFilter::from("drama")));
//! assert_eq!(state.filter.visible_ids(), vec!["2"]);
//! assert_eq!(
//!     state.page.live_region().message(),
//!     "Showing 1 stories for drama filter"
//! );
//! ```

pub mod app;
pub mod domain;
pub mod events;
pub mod infrastructure;
pub mod observability;
pub mod registry;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{ColorScheme, GenreFilter, Item, Result, StoryshelfError, Theme};
pub use registry::{DocumentContract, ItemRegistry};

use app::TransitionTiming;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use storage::{JsonPreferenceStore, MemoryPreferenceStore, Preferences};

/// Preference key the theme is stored under.
pub const DEFAULT_THEME_KEY: &str = "storyshelf.theme";

/// Runtime configuration.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes:
///
/// ```toml
/// stagger_ms = 50
/// trace_level = "debug"
///
/// [contract]
/// item_id_attr = "data-id"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Namespaced preference key for the theme. Default: `"storyshelf.theme"`
    pub theme_key: String,

    /// Gap between consecutive card reveals, in milliseconds. Default: 100
    pub stagger_ms: u64,

    /// Fade-out time before a card leaves the layout, in milliseconds. Default: 300
    pub hide_delay_ms: u64,

    /// Banner auto-dismiss delay, in milliseconds. Default: 5000
    pub notification_timeout_ms: u64,

    /// Tracing level or filter directive. `RUST_LOG` takes precedence.
    pub trace_level: Option<String>,

    /// Log file; stderr when unset.
    pub trace_file: Option<String>,

    /// JSON preference file. A leading `~` is expanded. Defaults to
    /// `preferences.json` in the data directory.
    pub preferences_path: Option<String>,

    /// Attribute and class names in the host document.
    pub contract: DocumentContract,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_key: DEFAULT_THEME_KEY.to_string(),
            stagger_ms: 100,
            hide_delay_ms: 300,
            notification_timeout_ms: 5000,
            trace_level: None,
            trace_file: None,
            preferences_path: None,
            contract: DocumentContract::default(),
        }
    }
}

impl Config {
    /// Parses configuration from a flat key/value map, as hosts pass it.
    ///
    /// Unknown keys are ignored; unparsable numbers keep their default.
    /// Contract fields use their own names (`item_id_attr`, `genres_attr`, ...).
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use storyshelf::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("stagger_ms".to_string(), "40".to_string());
    /// map.insert("hide_delay_ms".to_string(), "soon".to_string());
    /// map.insert("genres_attr".to_string(), "data-tags".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.stagger_ms, 40);
    /// assert_eq!(config.hide_delay_ms, 300);
    /// assert_eq!(config.contract.genres_attr, "data-tags");
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(String::from);
        let millis = |key: &str, default: u64| {
            map.get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let base = defaults.contract;
        let contract = DocumentContract {
            item_id_attr: text("item_id_attr").unwrap_or(base.item_id_attr),
            genres_attr: text("genres_attr").unwrap_or(base.genres_attr),
            title_class: text("title_class").unwrap_or(base.title_class),
            synopsis_class: text("synopsis_class").unwrap_or(base.synopsis_class),
            filter_attr: text("filter_attr").unwrap_or(base.filter_attr),
            theme_toggle_id: text("theme_toggle_id").unwrap_or(base.theme_toggle_id),
            main_content_id: text("main_content_id").unwrap_or(base.main_content_id),
        };

        Self {
            theme_key: text("theme_key").unwrap_or(defaults.theme_key),
            stagger_ms: millis("stagger_ms", defaults.stagger_ms),
            hide_delay_ms: millis("hide_delay_ms", defaults.hide_delay_ms),
            notification_timeout_ms: millis("notification_timeout_ms", defaults.notification_timeout_ms),
            trace_level: text("trace_level"),
            trace_file: text("trace_file"),
            preferences_path: text("preferences_path"),
            contract,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StoryshelfError::Io`] if the file cannot be read and
    /// [`StoryshelfError::Config`] if it is not valid TOML for this type.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&contents).map_err(|e| StoryshelfError::Config(format!("failed to parse config TOML: {e}")))
    }

    /// Reveal stagger and hide delay.
    #[must_use]
    pub const fn transition_timing(&self) -> TransitionTiming {
        TransitionTiming {
            stagger: Duration::from_millis(self.stagger_ms),
            hide_delay: Duration::from_millis(self.hide_delay_ms),
        }
    }

    /// Banner auto-dismiss delay.
    #[must_use]
    pub const fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

/// Opens the JSON preference store named by the configuration.
///
/// Never fails: when no location is known or the file cannot be opened, an
/// in-memory store is used for the session and the problem is logged at
/// debug level.
#[must_use]
pub fn open_preferences(config: &Config) -> Preferences {
    let path = config
        .preferences_path
        .as_deref()
        .map(infrastructure::expand_tilde)
        .or_else(infrastructure::default_preferences_path);

    let Some(path) = path else {
        tracing::debug!("no data directory, keeping preferences in memory");
        return Preferences::new(MemoryPreferenceStore::default());
    };

    match JsonPreferenceStore::open(&path) {
        Ok(store) => Preferences::new(store),
        Err(e) => {
            tracing::debug!(path = ?path, error = %e, "preference file unavailable, keeping preferences in memory");
            Preferences::new(MemoryPreferenceStore::default())
        }
    }
}

/// Imports the document and builds the application state.
///
/// The initial theme is applied to the page; nothing is published and the
/// preference store is not written.
pub fn initialize(config: &Config, html: &str, prefs: Preferences, system: ColorScheme) -> AppState {
    tracing::debug!("initializing storyshelf");

    let registry = ItemRegistry::load_from_document(html, &config.contract);
    if registry.is_empty() {
        tracing::warn!("document contains no usable story cards");
    }

    AppState::new(config, registry, prefs, system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storyshelf.toml");
        std::fs::write(
            &path,
            "hide_delay_ms = 0\ntrace_level = \"debug\"\n\n[contract]\nitem_id_attr = \"data-id\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.hide_delay_ms, 0);
        assert_eq!(config.stagger_ms, 100);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.contract.item_id_attr, "data-id");
        assert_eq!(config.contract.genres_attr, "data-genres");
    }

    #[test]
    fn invalid_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "stagger_ms = \"fast\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(StoryshelfError::Config(_))));
        assert!(matches!(
            Config::from_file(dir.path().join("missing.toml")),
            Err(StoryshelfError::Io(_))
        ));
    }

    #[test]
    fn open_preferences_persists_to_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let config = Config {
            preferences_path: Some(path.to_string_lossy().into_owned()),
            ..Config::default()
        };

        let mut prefs = open_preferences(&config);
        prefs.set(DEFAULT_THEME_KEY, "dark");
        assert!(path.exists());
        assert_eq!(open_preferences(&config).get(DEFAULT_THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_preference_file_is_repaired_by_next_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json at all").unwrap();
        let config = Config {
            preferences_path: Some(path.to_string_lossy().into_owned()),
            ..Config::default()
        };

        let mut state = initialize(&config, "", open_preferences(&config), ColorScheme::Light);
        assert_eq!(state.theme.current(), Theme::Light);
        handle_event(&mut state, &Event::ToggleTheme);

        assert_eq!(open_preferences(&config).get(DEFAULT_THEME_KEY).as_deref(), Some("dark"));
    }
}
