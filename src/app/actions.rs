//! Side effects the host performs after an event is handled.
//!
//! The crate never touches a real clock or the real focus; it asks the host
//! to do so through these commands.

use std::time::Duration;

/// Commands for the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Deliver a [`Tick`](crate::app::Event::Tick) no later than this
    /// monotonic time; the earliest pending timer is due then.
    ScheduleWake(Duration),

    /// Move keyboard focus to the element with this id.
    Focus(String),
}
