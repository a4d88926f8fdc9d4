//! Application layer coordinating controllers, timers and host actions.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! Host input → Event → handle_event → controller mutates state
//!                                        → page model updated
//!                                        → EventBus::publish → subscribers
//!                                     ← (render?, Vec<Action>)
//! ```
//!
//! Delayed work (staggered reveals, fade-outs, banner auto-dismiss) goes into
//! the [`TimerQueue`]; the host reports time through [`Event::Tick`] and is
//! told when to do so through [`Action::ScheduleWake`].
//!
//! # Modules
//!
//! - [`actions`]: side effects for the host
//! - [`filter`]: genre filter controller
//! - [`handler`]: event dispatch with fault isolation
//! - [`keys`]: keyboard shortcuts
//! - [`notifications`]: transient banners
//! - [`scheduler`]: virtual timer queue
//! - [`state`]: the [`AppState`] container
//! - [`theme`]: theme controller

pub mod actions;
pub mod filter;
pub mod handler;
pub mod keys;
pub mod notifications;
pub mod scheduler;
pub mod state;
pub mod theme;

pub use actions::Action;
pub use filter::{FilterController, TransitionTiming};
pub use handler::{handle_event, Event};
pub use keys::{map_key, KeyPress};
pub use notifications::{Notification, NotificationCenter, NotificationId, NotificationKind, GENERIC_FAILURE};
pub use scheduler::{TimerId, TimerQueue, TimerTask};
pub use state::AppState;
pub use theme::ThemeController;
