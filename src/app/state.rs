//! Central application state.
//!
//! [`AppState`] is built once at startup and owns every controller. Nothing
//! lives in module-level statics; collaborators get the pieces they need by
//! reference from the event handler.

use crate::app::filter::FilterController;
use crate::app::notifications::NotificationCenter;
use crate::app::scheduler::{TimerQueue, TimerTask};
use crate::app::theme::ThemeController;
use crate::domain::ColorScheme;
use crate::events::{AnalyticsHook, EventBus};
use crate::registry::ItemRegistry;
use crate::storage::Preferences;
use crate::ui::live_region::LiveRegion;
use crate::ui::page::PageModel;
use crate::Config;
use std::sync::Arc;
use std::time::Duration;

/// Everything the page script keeps alive between events.
#[derive(Debug)]
pub struct AppState {
    /// Items and controls imported from the document.
    pub registry: ItemRegistry,

    pub theme: ThemeController,
    pub filter: FilterController,
    pub bus: EventBus,

    /// Document-side attributes for the host to render.
    pub page: PageModel,

    pub timers: TimerQueue<TimerTask>,
    pub notifications: NotificationCenter,
    pub prefs: Preferences,
    pub analytics: AnalyticsHook,

    /// Host monotonic time as of the last event that carried one.
    pub now: Duration,

    /// Element that `Alt+M` focuses.
    pub main_content_id: String,

    /// Wake time last reported to the host.
    pub(crate) announced_wake: Option<Duration>,
}

impl AppState {
    /// Wires the controllers together and applies the initial theme.
    ///
    /// Subscribers are attached in a fixed order: live region first, then
    /// analytics. Nothing is published during construction.
    pub fn new(config: &Config, registry: ItemRegistry, prefs: Preferences, system: ColorScheme) -> Self {
        let _span = tracing::debug_span!("app_state_new", items = registry.len()).entered();

        let mut bus = EventBus::new();
        let (live_region, _) = LiveRegion::attach(&mut bus, Arc::clone(registry.items()));
        let (analytics, _) = AnalyticsHook::attach(&mut bus);

        let mut page = PageModel::new(registry.items(), live_region);
        let theme = ThemeController::initialize(config.theme_key.clone(), &prefs, system, &mut page);
        let filter = FilterController::new(Arc::clone(registry.items()), config.transition_timing());

        if !registry.has_theme_toggle() {
            tracing::debug!("document has no theme toggle control");
        }

        Self {
            theme,
            filter,
            bus,
            page,
            timers: TimerQueue::new(),
            notifications: NotificationCenter::new(config.notification_timeout()),
            prefs,
            analytics,
            now: Duration::ZERO,
            main_content_id: config.contract.main_content_id.clone(),
            announced_wake: None,
            registry,
        }
    }

    /// Advances the clock, never backwards.
    pub(crate) fn advance_to(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenreFilter, Item, Theme};
    use crate::storage::MemoryPreferenceStore;

    #[test]
    fn starts_on_all_with_system_theme() {
        let registry = ItemRegistry::from_items(vec![
            Item::new("1", ["horror"], "One", "s").unwrap(),
            Item::new("2", ["drama"], "Two", "s").unwrap(),
        ]);
        let prefs = Preferences::new(MemoryPreferenceStore::default());
        let state = AppState::new(&Config::default(), registry, prefs, ColorScheme::Dark);

        assert_eq!(state.filter.current(), &GenreFilter::All);
        assert_eq!(state.page.visible_ids(), vec!["1", "2"]);
        assert_eq!(state.page.theme_attribute(), Some(Theme::Dark));
        assert_eq!(state.analytics.recorded(), 0);
        assert!(state.page.live_region().message().is_empty());
        assert!(state.timers.is_empty());
    }
}
