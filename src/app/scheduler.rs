//! Fire-and-forget timers driven by the host clock.
//!
//! The crate never sleeps or reads a clock of its own. Hosts deliver
//! [`Event::Tick`](crate::app::Event::Tick) with the current monotonic time and
//! every timer whose due time has passed fires, earliest first; timers due at
//! the same instant fire in scheduling order.

use crate::app::notifications::NotificationId;
use crate::domain::GenreFilter;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Deferred work scheduled by the controllers.
///
/// Filter tasks capture the filter that was current when they were scheduled
/// so a late firing can be recognized as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Show the item at `item` (index in document order).
    Reveal { item: usize, filter: GenreFilter },
    /// Finish hiding the item at `item` after its fade-out.
    Hide { item: usize, filter: GenreFilter },
    /// Auto-dismiss a notification.
    DismissNotification(NotificationId),
}

/// Ordered queue of pending timers.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), T>,
    due_at: HashMap<u64, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            pending: BTreeMap::new(),
            due_at: HashMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to fire once `at` has been reached.
    pub fn schedule(&mut self, at: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((at, seq), task);
        self.due_at.insert(seq, at);
        TimerId(seq)
    }

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.due_at
            .remove(&id.0)
            .and_then(|at| self.pending.remove(&(at, id.0)))
            .is_some()
    }

    /// Removes and returns every timer due at or before `now`, in firing order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use storyshelf::app::TimerQueue;
    ///
    /// let mut timers = TimerQueue::new();
    /// timers.schedule(Duration::from_millis(200), "late");
    /// timers.schedule(Duration::from_millis(100), "early");
    /// let fired: Vec<_> = timers
    ///     .pop_due(Duration::from_millis(150))
    ///     .into_iter()
    ///     .map(|(_, task)| task)
    ///     .collect();
    /// assert_eq!(fired, vec!["early"]);
    /// assert_eq!(timers.next_due(), Some(Duration::from_millis(200)));
    /// ```
    pub fn pop_due(&mut self, now: Duration) -> Vec<(TimerId, T)> {
        let later = self.pending.split_off(&(now, u64::MAX));
        let due = std::mem::replace(&mut self.pending, later);
        due.into_iter()
            .map(|((_, seq), task)| {
                self.due_at.remove(&seq);
                (TimerId(seq), task)
            })
            .collect()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn same_instant_fires_in_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(10), 'a');
        timers.schedule(ms(10), 'b');
        timers.schedule(ms(5), 'c');
        let fired: Vec<char> = timers.pop_due(ms(10)).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!['c', 'a', 'b']);
        assert!(timers.is_empty());
    }

    #[test]
    fn cancel_prevents_firing_once() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(ms(10), ());
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.pop_due(ms(100)).is_empty());
    }

    #[test]
    fn fired_timer_cannot_be_cancelled() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(ms(1), ());
        assert_eq!(timers.pop_due(ms(1)).len(), 1);
        assert!(!timers.cancel(id));
        assert_eq!(timers.len(), 0);
    }
}
