//! Analytics subscriber.
//!
//! Emits one `tracing` event per state change under the
//! `storyshelf::analytics` target, so hosts can route them with a filter
//! directive without subscribing themselves.

use crate::events::bus::{AppEvent, EventBus, EventName, SubscriptionId};
use std::cell::Cell;
use std::rc::Rc;

/// Counts and logs theme and filter changes.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsHook {
    recorded: Rc<Cell<u64>>,
}

impl AnalyticsHook {
    /// Subscribes the hook to every event name on `bus`.
    pub fn attach(bus: &mut EventBus) -> (Self, [SubscriptionId; 2]) {
        let hook = Self::default();
        let ids = [EventName::ThemeChanged, EventName::FilterChanged].map(|name| {
            let recorded = Rc::clone(&hook.recorded);
            bus.subscribe(name, move |event| {
                recorded.set(recorded.get() + 1);
                let payload = match event {
                    AppEvent::ThemeChanged { theme } => theme.to_string(),
                    AppEvent::FilterChanged { genre } => genre.to_string(),
                };
                tracing::info!(
                    target: "storyshelf::analytics",
                    event = %event.name(),
                    value = %payload,
                    "interaction"
                );
                Ok(())
            })
        });
        (hook, ids)
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn recorded(&self) -> u64 {
        self.recorded.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenreFilter, Theme};

    #[test]
    fn counts_every_event() {
        let mut bus = EventBus::new();
        let (hook, _) = AnalyticsHook::attach(&mut bus);
        bus.publish(&AppEvent::ThemeChanged { theme: Theme::Dark });
        bus.publish(&AppEvent::FilterChanged { genre: GenreFilter::All });
        assert_eq!(hook.recorded(), 2);
    }
}
