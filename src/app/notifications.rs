//! Transient notification banners.
//!
//! Each banner gets an auto-dismiss timer in the [`TimerQueue`]. Closing a
//! banner by hand cancels that timer, so a banner is only ever removed once.

use crate::app::scheduler::{TimerId, TimerQueue, TimerTask};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Message shown when an event could not be handled.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please refresh the page.";

/// Identifier of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Raw numeric value, as shown to hosts.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for NotificationId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual category of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

/// A banner currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    /// Unix timestamp (seconds) of creation.
    pub created_at: i64,
}

#[derive(Debug, Clone)]
struct Entry {
    notification: Notification,
    timer: TimerId,
}

/// Owner of the visible banners, oldest first.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    next_id: u64,
    entries: Vec<Entry>,
    timeout: Duration,
}

impl NotificationCenter {
    /// Creates an empty center whose banners dismiss after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
            timeout,
        }
    }

    /// Shows a banner and schedules its auto-dismiss.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Duration,
        timers: &mut TimerQueue<TimerTask>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let notification = Notification {
            id,
            message: message.into(),
            kind,
            created_at: Utc::now().timestamp(),
        };
        let timer = timers.schedule(now + self.timeout, TimerTask::DismissNotification(id));

        tracing::debug!(id = %id, kind = ?kind, message = %notification.message, "notification shown");
        self.entries.push(Entry { notification, timer });
        id
    }

    /// Closes a banner on user request and cancels its auto-dismiss timer.
    ///
    /// Returns `false` if the banner is already gone.
    pub fn close(&mut self, id: NotificationId, timers: &mut TimerQueue<TimerTask>) -> bool {
        let Some(entry) = self.remove(id) else {
            tracing::debug!(id = %id, "close for unknown notification");
            return false;
        };
        timers.cancel(entry.timer);
        tracing::debug!(id = %id, "notification closed");
        true
    }

    /// Removes a banner when its timer fires. No-op if it was already closed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let removed = self.remove(id).is_some();
        if removed {
            tracing::debug!(id = %id, "notification dismissed");
        }
        removed
    }

    fn remove(&mut self, id: NotificationId) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.notification.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Visible banners, newest last.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().map(|e| &e.notification)
    }

    /// Most recent banner.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last().map(|e| &e.notification)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
