//! Accessibility status region (`aria-live="polite"`).
//!
//! The region is an ordinary event-bus subscriber: it never reads controller
//! state, only the event payload and the shared item list.

use crate::domain::{GenreFilter, Item};
use crate::events::{AppEvent, EventBus, EventName, SubscriptionId};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Status text for a filter change.
///
/// # Examples
///
/// ```
/// use storyshelf::ui::live_region::status_message;
/// use storyshelf::GenreFilter;
///
/// assert_eq!(
///     status_message(2, &GenreFilter::from("drama")),
///     "Showing 2 stories for drama filter"
/// );
/// ```
#[must_use]
pub fn status_message(count: usize, genre: &GenreFilter) -> String {
    format!("Showing {count} stories for {genre} filter")
}

/// Shared handle to the status text.
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    message: Rc<RefCell<String>>,
}

impl LiveRegion {
    /// Creates a region and subscribes it to theme and filter changes.
    pub fn attach(bus: &mut EventBus, items: Arc<[Item]>) -> (Self, [SubscriptionId; 2]) {
        let region = Self::default();

        let message = Rc::clone(&region.message);
        let filter_id = bus.subscribe(EventName::FilterChanged, move |event| {
            if let AppEvent::FilterChanged { genre } = event {
                let count = items.iter().filter(|item| genre.matches(item)).count();
                *message.borrow_mut() = status_message(count, genre);
            }
            Ok(())
        });

        let message = Rc::clone(&region.message);
        let theme_id = bus.subscribe(EventName::ThemeChanged, move |event| {
            if let AppEvent::ThemeChanged { theme } = event {
                *message.borrow_mut() = format!("Switched to {theme} theme");
            }
            Ok(())
        });

        (region, [filter_id, theme_id])
    }

    /// Current announcement, empty until the first event.
    #[must_use]
    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }
}
