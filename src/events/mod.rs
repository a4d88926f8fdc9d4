//! In-process event bus and the closed set of events it carries.
//!
//! Controllers publish after their state and the page model are consistent;
//! subscribers (live region, analytics, hosts) react synchronously.
//!
//! ```text
//! ThemeController ──┐                       ┌──► LiveRegion
//!                   ├──► EventBus::publish ─┼──► AnalyticsHook
//! FilterController ─┘                       └──► host subscribers
//! ```
//!
//! # Modules
//!
//! - [`bus`]: [`EventBus`] with per-subscriber failure isolation
//! - [`analytics`]: tracing-backed analytics subscriber

pub mod analytics;
pub mod bus;

pub use analytics::AnalyticsHook;
pub use bus::{AppEvent, Delivery, EventBus, EventName, SubscriptionId};
