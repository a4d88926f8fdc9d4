//! Keyboard shortcuts.
//!
//! | Keys            | Effect                                   |
//! |-----------------|------------------------------------------|
//! | `Alt+T`         | toggle theme                             |
//! | `Alt+M`         | focus main content                       |
//! | `Alt+1`..`Alt+9`| select the N-th filter control           |

use crate::app::handler::Event;
use crate::domain::error::{Result, StoryshelfError};
use std::fmt;
use std::str::FromStr;

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: char,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyPress {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(key: char) -> Self {
        Self {
            key,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    /// A key with only Alt held.
    #[must_use]
    pub const fn alt(key: char) -> Self {
        Self {
            key,
            alt: true,
            ctrl: false,
            shift: false,
        }
    }
}

impl FromStr for KeyPress {
    type Err = StoryshelfError;

    /// Parses combos like `alt+t`, `Alt+3` or `ctrl+shift+x`.
    fn from_str(s: &str) -> Result<Self> {
        let mut press = Self::plain(' ');
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "alt" | "option" => press.alt = true,
                "ctrl" | "control" => press.ctrl = true,
                "shift" => press.shift = true,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        _ => {
                            return Err(StoryshelfError::Config(format!("invalid key combination: {s:?}")));
                        }
                    }
                }
            }
        }

        press.key = key.ok_or_else(|| StoryshelfError::Config(format!("no key in combination: {s:?}")))?;
        Ok(press)
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

/// Maps a key press to the event it triggers, if any.
///
/// `control_count` is the number of filter controls on the page; digit
/// shortcuts past it are ignored.
///
/// # Examples
///
/// ```
/// use storyshelf::app::{map_key, Event, KeyPress};
///
/// assert_eq!(map_key(&KeyPress::alt('T'), 0), Some(Event::ToggleTheme));
/// assert_eq!(map_key(&KeyPress::alt('2'), 3), Some(Event::SelectFilterControl(1)));
/// assert_eq!(map_key(&KeyPress::alt('4'), 3), None);
/// assert_eq!(map_key(&KeyPress::plain('t'), 3), None);
/// ```
#[must_use]
pub fn map_key(press: &KeyPress, control_count: usize) -> Option<Event> {
    if !press.alt || press.ctrl {
        return None;
    }

    match press.key.to_ascii_lowercase() {
        't' => Some(Event::ToggleTheme),
        'm' => Some(Event::FocusMainContent),
        c @ '1'..='9' => {
            let index = c.to_digit(10).map(|n| n as usize - 1)?;
            (index < control_count).then_some(Event::SelectFilterControl(index))
        }
        _ => None,
    }
}
