//! Genre filter controller and its staged card transitions.
//!
//! Visibility is always derived from the current filter, never stored. The
//! page model only carries the transitional display state, and every delayed
//! step re-derives the target from the filter that is current when it fires.
//! A timer whose captured filter is no longer current is dropped, which makes
//! rapid selections last-write-wins.

use crate::app::scheduler::{TimerQueue, TimerTask};
use crate::domain::{GenreFilter, Item};
use crate::events::{AppEvent, EventBus};
use crate::ui::page::{DisplayState, PageModel};
use std::sync::Arc;
use std::time::Duration;

/// Delays of the staged show/hide animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Gap between consecutive reveals.
    pub stagger: Duration,
    /// Fade-out time before a card leaves the layout.
    pub hide_delay: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            stagger: Duration::from_millis(100),
            hide_delay: Duration::from_millis(300),
        }
    }
}

impl TransitionTiming {
    /// Timing with no delays; every change lands immediately.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            stagger: Duration::ZERO,
            hide_delay: Duration::ZERO,
        }
    }
}

/// Owner of the current genre filter.
#[derive(Debug, Clone)]
pub struct FilterController {
    current: GenreFilter,
    items: Arc<[Item]>,
    timing: TransitionTiming,
}

impl FilterController {
    /// Starts on [`GenreFilter::All`]; the page is expected to show every card.
    #[must_use]
    pub fn new(items: Arc<[Item]>, timing: TransitionTiming) -> Self {
        Self {
            current: GenreFilter::All,
            items,
            timing,
        }
    }

    /// The active filter.
    #[must_use]
    pub const fn current(&self) -> &GenreFilter {
        &self.current
    }

    /// Makes `genre` the active filter and starts the card transitions.
    ///
    /// Cards leaving the view start fading at once and are removed after the
    /// hide delay. Cards entering the view are revealed one stagger step apart
    /// in document order. Publishes `filterChanged` once the page reflects the
    /// new selection.
    pub fn select_filter(
        &mut self,
        genre: GenreFilter,
        now: Duration,
        page: &mut PageModel,
        timers: &mut TimerQueue<TimerTask>,
        bus: &mut EventBus,
    ) {
        let _span = tracing::debug_span!("select_filter", genre = %genre).entered();

        self.current = genre;
        let mut reveals: u32 = 0;
        let mut hides = 0usize;

        for (index, item) in self.items.iter().enumerate() {
            let visible = self.current.matches(item);
            let Some(state) = page.display(index) else {
                continue;
            };

            match (visible, state) {
                (true, DisplayState::Shown) | (false, DisplayState::Hidden) => {}
                (true, DisplayState::Hiding) => {
                    page.set_display(index, DisplayState::Shown);
                }
                (true, DisplayState::Hidden) => {
                    let offset = self.timing.stagger * reveals;
                    reveals += 1;
                    if offset.is_zero() {
                        page.set_display(index, DisplayState::Shown);
                    } else {
                        timers.schedule(
                            now + offset,
                            TimerTask::Reveal {
                                item: index,
                                filter: self.current.clone(),
                            },
                        );
                    }
                }
                (false, DisplayState::Shown | DisplayState::Hiding) => {
                    hides += 1;
                    if self.timing.hide_delay.is_zero() {
                        page.set_display(index, DisplayState::Hidden);
                    } else {
                        page.set_display(index, DisplayState::Hiding);
                        timers.schedule(
                            now + self.timing.hide_delay,
                            TimerTask::Hide {
                                item: index,
                                filter: self.current.clone(),
                            },
                        );
                    }
                }
            }
        }

        page.set_pressed_filter(self.current.clone());
        tracing::debug!(reveals, hides, visible = self.visible_count(), "filter selected");

        bus.publish(&AppEvent::FilterChanged {
            genre: self.current.clone(),
        });
    }

    /// Applies a fired reveal or hide timer. Returns `true` if the page changed.
    ///
    /// Tasks scheduled under a filter that is no longer current are ignored.
    pub fn on_timer(&self, task: &TimerTask, page: &mut PageModel) -> bool {
        let (item, filter) = match task {
            TimerTask::Reveal { item, filter } | TimerTask::Hide { item, filter } => (*item, filter),
            TimerTask::DismissNotification(_) => return false,
        };

        if *filter != self.current {
            tracing::trace!(item, stale = %filter, current = %self.current, "dropping stale transition");
            return false;
        }

        let Some(entry) = self.items.get(item) else {
            return false;
        };
        let target = if self.current.matches(entry) {
            DisplayState::Shown
        } else {
            DisplayState::Hidden
        };
        page.set_display(item, target)
    }

    /// Number of items the current filter shows.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|item| self.current.matches(item)).count()
    }

    /// Ids of the items the current filter shows, in document order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| self.current.matches(item))
            .map(|item| item.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::LiveRegion;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn items() -> Arc<[Item]> {
        vec![
            Item::new("1", ["horror"], "One", "s").unwrap(),
            Item::new("2", ["comedy", "drama"], "Two", "s").unwrap(),
            Item::new("3", ["drama"], "Three", "s").unwrap(),
        ]
        .into()
    }

    struct Fixture {
        filter: FilterController,
        page: PageModel,
        timers: TimerQueue<TimerTask>,
        bus: EventBus,
    }

    impl Fixture {
        fn new(timing: TransitionTiming) -> Self {
            let items = items();
            Self {
                page: PageModel::new(&items, LiveRegion::default()),
                filter: FilterController::new(items, timing),
                timers: TimerQueue::new(),
                bus: EventBus::new(),
            }
        }

        fn select(&mut self, genre: &str, now: Duration) {
            self.filter
                .select_filter(GenreFilter::from(genre), now, &mut self.page, &mut self.timers, &mut self.bus);
        }

        fn advance(&mut self, now: Duration) {
            for (_, task) in self.timers.pop_due(now) {
                self.filter.on_timer(&task, &mut self.page);
            }
        }
    }

    #[test]
    fn hides_after_delay_then_settles() {
        let mut fx = Fixture::new(TransitionTiming::default());
        fx.select("drama", ms(0));

        assert_eq!(fx.page.display(0), Some(DisplayState::Hiding));
        assert_eq!(fx.page.visible_ids(), vec!["2", "3"]);

        fx.advance(ms(299));
        assert_eq!(fx.page.display(0), Some(DisplayState::Hiding));
        fx.advance(ms(300));
        assert_eq!(fx.page.display(0), Some(DisplayState::Hidden));
        assert_eq!(fx.page.pressed_filter(), &GenreFilter::from("drama"));
    }

    #[test]
    fn reveals_are_staggered_in_document_order() {
        let mut fx = Fixture::new(TransitionTiming::default());
        fx.select("horror", ms(0));
        fx.advance(ms(1000));
        assert_eq!(fx.page.visible_ids(), vec!["1"]);

        fx.select("all", ms(1000));
        // First revealed card appears at once, the next one step later.
        assert_eq!(fx.page.visible_ids(), vec!["1", "2"]);
        fx.advance(ms(1099));
        assert_eq!(fx.page.display(2), Some(DisplayState::Hidden));
        fx.advance(ms(1100));
        assert_eq!(fx.page.visible_ids(), vec!["1", "2", "3"]);
    }

    #[test]
    fn stale_timers_do_not_override_latest_selection() {
        let mut fx = Fixture::new(TransitionTiming::default());
        fx.select("horror", ms(0));
        // Item 3 is fading out for "horror" when "drama" arrives.
        fx.select("drama", ms(50));
        fx.advance(ms(10_000));

        assert_eq!(fx.page.visible_ids(), vec!["2", "3"]);
        assert_eq!(fx.page.visible_ids(), fx.filter.visible_ids());
    }

    #[test]
    fn fading_card_rescheduled_under_new_filter() {
        let mut fx = Fixture::new(TransitionTiming::default());
        fx.select("horror", ms(0));
        fx.select("comedy", ms(10));
        fx.advance(ms(10_000));
        assert_eq!(fx.page.visible_ids(), vec!["2"]);
        assert_eq!(fx.page.display(2), Some(DisplayState::Hidden));
    }

    #[test]
    fn repeated_selection_is_idempotent() {
        let mut fx = Fixture::new(TransitionTiming::immediate());
        fx.select("drama", ms(0));
        let once: Vec<String> = fx.page.visible_ids().into_iter().map(String::from).collect();
        fx.select("drama", ms(0));
        assert_eq!(fx.page.visible_ids(), once);
        assert_eq!(fx.filter.visible_count(), 2);
        assert!(fx.timers.is_empty());
    }

    #[test]
    fn unknown_genre_hides_everything() {
        let mut fx = Fixture::new(TransitionTiming::immediate());
        fx.select("western", ms(0));
        assert!(fx.page.visible_ids().is_empty());
        assert_eq!(fx.filter.visible_count(), 0);
    }
}
