//! Synchronous publish/subscribe with a closed event set.

use crate::domain::error::Result;
use crate::domain::{GenreFilter, Theme};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Names of the events the bus carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    ThemeChanged,
    FilterChanged,
}

impl EventName {
    /// Wire name of the event, as announced to host subscribers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThemeChanged => "themeChanged",
            Self::FilterChanged => "filterChanged",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state-change announcement with its payload.
///
/// Serializes as `{"name": "themeChanged", "payload": {"theme": "dark"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "camelCase")]
pub enum AppEvent {
    ThemeChanged { theme: Theme },
    FilterChanged { genre: GenreFilter },
}

impl AppEvent {
    /// Returns the event's name.
    #[must_use]
    pub const fn name(&self) -> EventName {
        match self {
            Self::ThemeChanged { .. } => EventName::ThemeChanged,
            Self::FilterChanged { .. } => EventName::FilterChanged,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Outcome of a single [`EventBus::publish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Handlers that ran to completion.
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

type Handler = Box<dyn FnMut(&AppEvent) -> Result<()>>;

struct Subscriber {
    id: SubscriptionId,
    name: EventName,
    handler: Handler,
}

/// Process-wide event bus.
///
/// Delivery is synchronous, in subscription order, to the subscribers present
/// at publish time. A subscriber that returns `Err` or panics is logged and
/// skipped; the remaining subscribers still receive the event. Events
/// published with no subscribers are dropped; there is no replay.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use storyshelf::events::{AppEvent, EventBus, EventName};
/// use storyshelf::Theme;
///
/// let mut bus = EventBus::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// bus.subscribe(EventName::ThemeChanged, move |event| {
///     sink.borrow_mut().push(event.clone());
///     Ok(())
/// });
///
/// let delivery = bus.publish(&AppEvent::ThemeChanged { theme: Theme::Dark });
/// assert_eq!(delivery.delivered, 1);
/// assert_eq!(seen.borrow().len(), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events named `name`.
    pub fn subscribe<F>(&mut self, name: EventName, handler: F) -> SubscriptionId
    where
        F: FnMut(&AppEvent) -> Result<()> + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push(Subscriber {
            id,
            name,
            handler: Box::new(handler),
        });
        tracing::trace!(event = %name, subscription = id.0, "subscribed");
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Number of subscribers registered for `name`.
    #[must_use]
    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.subscribers.iter().filter(|s| s.name == name).count()
    }

    /// Delivers `event` to every current subscriber of its name.
    pub fn publish(&mut self, event: &AppEvent) -> Delivery {
        let name = event.name();
        let _span = tracing::debug_span!("publish", event = %name).entered();

        let mut delivery = Delivery::default();
        for subscriber in self.subscribers.iter_mut().filter(|s| s.name == name) {
            match catch_unwind(AssertUnwindSafe(|| (subscriber.handler)(event))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(e)) => {
                    delivery.failed += 1;
                    tracing::warn!(subscription = subscriber.id.0, error = %e, "subscriber failed");
                }
                Err(payload) => {
                    delivery.failed += 1;
                    tracing::warn!(
                        subscription = subscriber.id.0,
                        panic = %panic_message(payload.as_ref()),
                        "subscriber panicked"
                    );
                }
            }
        }

        tracing::debug!(delivered = delivery.delivered, failed = delivery.failed, "event published");
        delivery
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoryshelfError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl FnMut(&AppEvent) -> Result<()> {
        let log = Rc::clone(log);
        move |_| {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }

    #[test]
    fn delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventName::FilterChanged, recorder(&log, "first"));
        bus.subscribe(EventName::FilterChanged, recorder(&log, "second"));
        bus.subscribe(EventName::ThemeChanged, recorder(&log, "theme"));

        let delivery = bus.publish(&AppEvent::FilterChanged { genre: GenreFilter::All });

        assert_eq!(delivery, Delivery { delivered: 2, failed: 0 });
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn isolates_failing_and_panicking_subscribers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventName::ThemeChanged, |_| {
            Err(StoryshelfError::Handler("boom".to_string()))
        });
        bus.subscribe(EventName::ThemeChanged, |_| panic!("subscriber exploded"));
        bus.subscribe(EventName::ThemeChanged, recorder(&log, "survivor"));

        let delivery = bus.publish(&AppEvent::ThemeChanged { theme: Theme::Dark });

        assert_eq!(delivery, Delivery { delivered: 1, failed: 2 });
        assert_eq!(*log.borrow(), vec!["survivor"]);
    }

    #[test]
    fn no_replay_for_late_subscribers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let delivery = bus.publish(&AppEvent::ThemeChanged { theme: Theme::Light });
        assert_eq!(delivery, Delivery::default());

        bus.subscribe(EventName::ThemeChanged, recorder(&log, "late"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let id = bus.subscribe(EventName::ThemeChanged, recorder(&log, "gone"));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        bus.publish(&AppEvent::ThemeChanged { theme: Theme::Dark });
        assert!(log.borrow().is_empty());
        assert_eq!(bus.subscriber_count(EventName::ThemeChanged), 0);
    }

    #[test]
    fn payloads_serialize_with_wire_names() {
        let json = serde_json::to_value(AppEvent::FilterChanged { genre: GenreFilter::from("drama") }).unwrap();
        assert_eq!(json, serde_json::json!({"name": "filterChanged", "payload": {"genre": "drama"}}));
        let json = serde_json::to_value(AppEvent::ThemeChanged { theme: Theme::Dark }).unwrap();
        assert_eq!(json, serde_json::json!({"name": "themeChanged", "payload": {"theme": "dark"}}));
    }
}
