//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point hosts call. It dispatches to the
//! owning controller, then reports whether the page needs re-rendering and
//! which side effects the host should perform.
//!
//! Faults never escape: an error or panic while handling one event is logged,
//! shown to the user as a generic failure notification, and the state stays
//! usable for the next event.

use crate::app::keys::{map_key, KeyPress};
use crate::app::notifications::{NotificationId, NotificationKind, GENERIC_FAILURE};
use crate::app::scheduler::TimerTask;
use crate::app::{Action, AppState};
use crate::domain::error::{Result, StoryshelfError};
use crate::domain::{ColorScheme, GenreFilter};
use crate::events::bus::panic_message;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

/// Input delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The theme toggle control was activated.
    ToggleTheme,
    /// The OS color scheme changed.
    SystemSchemeChanged(ColorScheme),
    /// A filter was chosen by genre.
    SelectFilter(GenreFilter),
    /// The filter control at this index (document order) was activated.
    SelectFilterControl(usize),
    /// Move focus to the main content landmark.
    FocusMainContent,
    /// A key press, mapped through the shortcut table.
    Key(KeyPress),
    /// Current host monotonic time; fires due timers.
    Tick(Duration),
    /// Show a banner.
    Notify {
        message: String,
        kind: NotificationKind,
    },
    /// The close button of a banner was pressed.
    CloseNotification(NotificationId),
}

/// Processes an event and returns whether to re-render plus the host actions.
///
/// # Example
///
/// ```rust
/// use storyshelf::app::{handle_event, AppState, Event};
/// use storyshelf::registry::ItemRegistry;
/// use storyshelf::storage::Preferences;
/// use storyshelf::{ColorScheme, Config, Theme};
///
/// let mut state = AppState::new(
///     &Config::default(),
///     ItemRegistry::default(),
///     Preferences::unavailable(),
///     ColorScheme::Light,
/// );
/// let (render, actions) = handle_event(&mut state, &Event::ToggleTheme);
/// assert!(render);
/// assert!(actions.is_empty());
/// assert_eq!(state.theme.current(), Theme::Dark);
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let outcome = catch_unwind(AssertUnwindSafe(|| dispatch(state, event)));
    let (render, mut actions) = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "event handling failed");
            report_failure(state)
        }
        Err(payload) => {
            tracing::error!(panic = %panic_message(payload.as_ref()), "event handler panicked");
            report_failure(state)
        }
    };

    let next = state.timers.next_due();
    if next != state.announced_wake {
        state.announced_wake = next;
        if let Some(at) = next {
            tracing::trace!(at_ms = at.as_millis(), "requesting wake");
            actions.push(Action::ScheduleWake(at));
        }
    }

    (render, actions)
}

fn report_failure(state: &mut AppState) -> (bool, Vec<Action>) {
    let now = state.now;
    state
        .notifications
        .show(GENERIC_FAILURE, NotificationKind::Error, now, &mut state.timers);
    (true, vec![])
}

fn dispatch(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::ToggleTheme => {
            state.theme.toggle(&mut state.prefs, &mut state.page, &mut state.bus);
            Ok((true, vec![]))
        }
        Event::SystemSchemeChanged(scheme) => {
            let changed = state
                .theme
                .on_system_change(*scheme, &state.prefs, &mut state.page, &mut state.bus);
            Ok((changed, vec![]))
        }
        Event::SelectFilter(genre) => {
            select(state, genre.clone());
            Ok((true, vec![]))
        }
        Event::SelectFilterControl(index) => {
            let genre = state
                .registry
                .controls()
                .get(*index)
                .map(|control| control.genre.clone())
                .ok_or_else(|| StoryshelfError::Handler(format!("no filter control at index {index}")))?;
            select(state, genre);
            Ok((true, vec![]))
        }
        Event::FocusMainContent => {
            if !state.registry.has_main_content() {
                tracing::debug!(id = %state.main_content_id, "main content target not found in document");
            }
            state.page.focus(state.main_content_id.clone());
            Ok((true, vec![Action::Focus(state.main_content_id.clone())]))
        }
        Event::Key(press) => match map_key(press, state.registry.controls().len()) {
            Some(mapped) => {
                tracing::debug!(key = %press, event = ?mapped, "shortcut");
                dispatch(state, &mapped)
            }
            None => Ok((false, vec![])),
        },
        Event::Tick(now) => {
            state.advance_to(*now);
            Ok((fire_due(state), vec![]))
        }
        Event::Notify { message, kind } => {
            let now = state.now;
            state.notifications.show(message.clone(), *kind, now, &mut state.timers);
            Ok((true, vec![]))
        }
        Event::CloseNotification(id) => Ok((state.notifications.close(*id, &mut state.timers), vec![])),
    }
}

fn select(state: &mut AppState, genre: GenreFilter) {
    let now = state.now;
    state
        .filter
        .select_filter(genre, now, &mut state.page, &mut state.timers, &mut state.bus);
}

fn fire_due(state: &mut AppState) -> bool {
    let due = state.timers.pop_due(state.now);
    if !due.is_empty() {
        tracing::trace!(count = due.len(), "firing timers");
    }

    let mut changed = false;
    for (_, task) in due {
        changed |= match &task {
            TimerTask::DismissNotification(id) => state.notifications.dismiss(*id),
            TimerTask::Reveal { .. } | TimerTask::Hide { .. } => state.filter.on_timer(&task, &mut state.page),
        };
    }
    changed
}
