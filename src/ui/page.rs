//! Document-side state written by the controllers.
//!
//! [`PageModel`] stands in for the attributes the page script would set on the
//! live document: the root theme attribute, each card's display state, the
//! pressed filter button and the focus target. Hosts render it; nothing in the
//! crate reads markup again after import.

use crate::domain::{GenreFilter, Item, Theme};
use crate::ui::live_region::LiveRegion;

/// Display state of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Fully visible.
    Shown,
    /// Fading out; a hide timer is pending.
    Hiding,
    /// Removed from layout.
    Hidden,
}

/// One card as the page shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub state: DisplayState,
}

/// Attributes the controllers maintain on the document.
#[derive(Debug, Clone)]
pub struct PageModel {
    theme_attribute: Option<Theme>,
    cards: Vec<CardView>,
    pressed_filter: GenreFilter,
    focused: Option<String>,
    live_region: LiveRegion,
}

impl PageModel {
    /// Creates the page for `items`, every card shown and "all" pressed.
    #[must_use]
    pub fn new(items: &[Item], live_region: LiveRegion) -> Self {
        Self {
            theme_attribute: None,
            cards: items
                .iter()
                .map(|item| CardView {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    state: DisplayState::Shown,
                })
                .collect(),
            pressed_filter: GenreFilter::All,
            focused: None,
            live_region,
        }
    }

    /// Sets the document theme attribute. Returns `true` if it changed.
    pub fn set_theme_attribute(&mut self, theme: Theme) -> bool {
        let changed = self.theme_attribute != Some(theme);
        self.theme_attribute = Some(theme);
        changed
    }

    /// Current document theme attribute, `None` before initialization.
    #[must_use]
    pub const fn theme_attribute(&self) -> Option<Theme> {
        self.theme_attribute
    }

    /// Display state of the card at `index`.
    #[must_use]
    pub fn display(&self, index: usize) -> Option<DisplayState> {
        self.cards.get(index).map(|card| card.state)
    }

    /// Sets the display state of the card at `index`. Returns `true` if it changed.
    pub fn set_display(&mut self, index: usize, state: DisplayState) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if card.state != state => {
                card.state = state;
                true
            }
            _ => false,
        }
    }

    /// All cards in document order.
    #[must_use]
    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    /// Ids of the cards currently [`DisplayState::Shown`], in document order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|card| card.state == DisplayState::Shown)
            .map(|card| card.id.as_str())
            .collect()
    }

    /// Marks the filter control for `filter` as pressed.
    pub fn set_pressed_filter(&mut self, filter: GenreFilter) {
        self.pressed_filter = filter;
    }

    /// Filter whose control is pressed.
    #[must_use]
    pub const fn pressed_filter(&self) -> &GenreFilter {
        &self.pressed_filter
    }

    /// Moves keyboard focus to the element with `id`.
    pub fn focus(&mut self, id: impl Into<String>) {
        self.focused = Some(id.into());
    }

    /// Id of the focused element, if the controllers moved focus.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// The accessibility status region.
    #[must_use]
    pub const fn live_region(&self) -> &LiveRegion {
        &self.live_region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_everything_shown() {
        let items = vec![
            Item::new("a", ["x"], "A", "s").unwrap(),
            Item::new("b", ["y"], "B", "s").unwrap(),
        ];
        let mut page = PageModel::new(&items, LiveRegion::default());
        assert_eq!(page.visible_ids(), vec!["a", "b"]);
        assert_eq!(page.theme_attribute(), None);

        assert!(page.set_display(1, DisplayState::Hiding));
        assert!(!page.set_display(1, DisplayState::Hiding));
        assert!(!page.set_display(9, DisplayState::Hidden));
        assert_eq!(page.visible_ids(), vec!["a"]);
    }

    #[test]
    fn theme_attribute_is_idempotent() {
        let mut page = PageModel::new(&[], LiveRegion::default());
        assert!(page.set_theme_attribute(Theme::Dark));
        assert!(!page.set_theme_attribute(Theme::Dark));
        assert_eq!(page.theme_attribute(), Some(Theme::Dark));
    }
}
