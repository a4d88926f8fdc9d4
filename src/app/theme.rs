//! Theme controller.
//!
//! Resolution order at startup is stored preference, then the system color
//! scheme, then [`Theme::Light`]. While nothing is stored and the user has not
//! toggled in this session, system scheme changes are followed live; the
//! first manual toggle ends that.

use crate::domain::{ColorScheme, Theme};
use crate::events::{AppEvent, EventBus};
use crate::storage::Preferences;
use crate::ui::page::PageModel;

/// Owner of the current theme.
#[derive(Debug, Clone)]
pub struct ThemeController {
    current: Theme,
    key: String,
    user_override: bool,
}

impl ThemeController {
    /// Resolves and applies the initial theme.
    ///
    /// Does not write the preference store and does not publish.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyshelf::app::ThemeController;
    /// use storyshelf::storage::{MemoryPreferenceStore, Preferences};
    /// use storyshelf::ui::{LiveRegion, PageModel};
    /// use storyshelf::{ColorScheme, Theme};
    ///
    /// let prefs = Preferences::new(MemoryPreferenceStore::default());
    /// let mut page = PageModel::new(&[], LiveRegion::default());
    /// let theme = ThemeController::initialize("storyshelf.theme", &prefs, ColorScheme::Dark, &mut page);
    /// assert_eq!(theme.current(), Theme::Dark);
    /// assert_eq!(page.theme_attribute(), Some(Theme::Dark));
    /// ```
    pub fn initialize(
        key: impl Into<String>,
        prefs: &Preferences,
        system: ColorScheme,
        page: &mut PageModel,
    ) -> Self {
        let key = key.into();
        let stored = stored_theme(prefs, &key);
        let current = stored.unwrap_or_else(|| Theme::from(system));

        tracing::debug!(
            theme = %current,
            from_preference = stored.is_some(),
            system = ?system,
            "theme resolved"
        );

        let controller = Self {
            current,
            key,
            user_override: false,
        };
        Self::apply(page, controller.current);
        controller
    }

    /// Theme currently in effect.
    #[must_use]
    pub const fn current(&self) -> Theme {
        self.current
    }

    /// Sets the document theme attribute. Idempotent.
    pub fn apply(page: &mut PageModel, theme: Theme) {
        if page.set_theme_attribute(theme) {
            tracing::trace!(theme = %theme, "theme attribute applied");
        }
    }

    /// Flips the theme, applies it, persists it and publishes `themeChanged`.
    pub fn toggle(&mut self, prefs: &mut Preferences, page: &mut PageModel, bus: &mut EventBus) -> Theme {
        let _span = tracing::debug_span!("toggle_theme", from = %self.current).entered();

        self.current = self.current.toggled();
        self.user_override = true;
        Self::apply(page, self.current);
        prefs.set(&self.key, self.current.as_str());
        bus.publish(&AppEvent::ThemeChanged { theme: self.current });

        tracing::debug!(theme = %self.current, "theme toggled");
        self.current
    }

    /// Whether system scheme changes are currently followed.
    #[must_use]
    pub fn follows_system(&self, prefs: &Preferences) -> bool {
        !self.user_override && stored_theme(prefs, &self.key).is_none()
    }

    /// Reacts to an OS color-scheme change.
    ///
    /// Switches (apply, then publish) only while [`follows_system`](Self::follows_system)
    /// holds. Never persists. Returns `true` if the theme changed.
    pub fn on_system_change(
        &mut self,
        scheme: ColorScheme,
        prefs: &Preferences,
        page: &mut PageModel,
        bus: &mut EventBus,
    ) -> bool {
        if !self.follows_system(prefs) {
            tracing::debug!(scheme = ?scheme, "explicit theme preference, ignoring system change");
            return false;
        }

        let theme = Theme::from(scheme);
        if theme == self.current {
            return false;
        }

        self.current = theme;
        Self::apply(page, theme);
        bus.publish(&AppEvent::ThemeChanged { theme });
        tracing::debug!(theme = %theme, "following system color scheme");
        true
    }
}

fn stored_theme(prefs: &Preferences, key: &str) -> Option<Theme> {
    let value = prefs.get(key)?;
    match value.parse() {
        Ok(theme) => Some(theme),
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "ignoring unrecognized stored theme");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryPreferenceStore, UnavailableStore};
    use crate::ui::LiveRegion;

    const KEY: &str = "storyshelf.theme";

    fn page() -> PageModel {
        PageModel::new(&[], LiveRegion::default())
    }

    #[test]
    fn stored_preference_beats_system() {
        let prefs = Preferences::new(MemoryPreferenceStore::with_value(KEY, "light"));
        let mut page = page();
        let theme = ThemeController::initialize(KEY, &prefs, ColorScheme::Dark, &mut page);
        assert_eq!(theme.current(), Theme::Light);
        assert!(!theme.follows_system(&prefs));
    }

    #[test]
    fn garbage_preference_falls_back_to_system() {
        let prefs = Preferences::new(MemoryPreferenceStore::with_value(KEY, "sepia"));
        let mut page = page();
        let theme = ThemeController::initialize(KEY, &prefs, ColorScheme::Dark, &mut page);
        assert_eq!(theme.current(), Theme::Dark);
    }

    #[test]
    fn initialize_does_not_persist() {
        let prefs = Preferences::new(MemoryPreferenceStore::default());
        let mut page = page();
        ThemeController::initialize(KEY, &prefs, ColorScheme::Dark, &mut page);
        assert_eq!(prefs.get(KEY), None);
    }

    #[test]
    fn toggle_twice_restores_and_persists_last() {
        let mut prefs = Preferences::new(MemoryPreferenceStore::default());
        let mut page = page();
        let mut bus = EventBus::new();
        let mut theme = ThemeController::initialize(KEY, &prefs, ColorScheme::Light, &mut page);

        assert_eq!(theme.toggle(&mut prefs, &mut page, &mut bus), Theme::Dark);
        assert_eq!(prefs.get(KEY).as_deref(), Some("dark"));
        assert_eq!(theme.toggle(&mut prefs, &mut page, &mut bus), Theme::Light);
        assert_eq!(prefs.get(KEY).as_deref(), Some("light"));
        assert_eq!(page.theme_attribute(), Some(Theme::Light));
    }

    #[test]
    fn follows_system_until_toggled() {
        let mut prefs = Preferences::new(MemoryPreferenceStore::default());
        let mut page = page();
        let mut bus = EventBus::new();
        let mut theme = ThemeController::initialize(KEY, &prefs, ColorScheme::Light, &mut page);

        assert!(theme.on_system_change(ColorScheme::Dark, &prefs, &mut page, &mut bus));
        assert_eq!(page.theme_attribute(), Some(Theme::Dark));
        assert_eq!(prefs.get(KEY), None);

        theme.toggle(&mut prefs, &mut page, &mut bus);
        assert!(!theme.on_system_change(ColorScheme::Dark, &prefs, &mut page, &mut bus));
        assert_eq!(theme.current(), Theme::Light);
    }

    #[test]
    fn toggle_stops_following_even_without_storage() {
        let mut prefs = Preferences::new(UnavailableStore);
        let mut page = page();
        let mut bus = EventBus::new();
        let mut theme = ThemeController::initialize(KEY, &prefs, ColorScheme::Dark, &mut page);
        assert_eq!(theme.current(), Theme::Dark);

        theme.toggle(&mut prefs, &mut page, &mut bus);
        assert_eq!(theme.current(), Theme::Light);
        assert!(!theme.on_system_change(ColorScheme::Dark, &prefs, &mut page, &mut bus));
    }
}
