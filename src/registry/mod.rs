//! One-time import of story cards and filter controls from the rendered page.
//!
//! The document is read exactly once at startup. Everything downstream works on
//! the immutable [`ItemRegistry`] and never queries markup again.
//!
//! # Modules
//!
//! - [`contract`]: configurable attribute/class names
//! - [`markup`]: lenient HTML scanner built on `quick-xml`

pub mod contract;
pub mod markup;

pub use contract::DocumentContract;

use crate::domain::{GenreFilter, Item};
use std::collections::HashSet;
use std::sync::Arc;

/// A filter button found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    /// Genre selected by the control.
    pub genre: GenreFilter,
    /// Visible label text (may be empty).
    pub label: String,
}

/// Immutable, document-ordered list of items plus the controls that act on them.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: Arc<[Item]>,
    controls: Vec<FilterControl>,
    has_theme_toggle: bool,
    has_main_content: bool,
}

impl ItemRegistry {
    /// Reads items and controls from `html`.
    ///
    /// Cards without an id, title or synopsis, or with no genre tags, are
    /// skipped with a warning; a duplicated id keeps its first card. Loading
    /// never fails as a whole.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyshelf::registry::{DocumentContract, ItemRegistry};
    ///
    /// let html = r#"
    ///   <article data-story-id="1" data-genres="horror">
    ///     <h3 class="story-title">One</h3><p class="story-synopsis">First</p>
    ///   </article>
    ///   <article data-story-id="2">
    ///     <h3 class="story-title">No genres</h3><p class="story-synopsis">Skipped</p>
    ///   </article>"#;
    /// let registry = ItemRegistry::load_from_document(html, &DocumentContract::default());
    /// assert_eq!(registry.len(), 1);
    /// assert_eq!(registry.items()[0].title, "One");
    /// ```
    #[must_use]
    pub fn load_from_document(html: &str, contract: &DocumentContract) -> Self {
        let _span = tracing::debug_span!("load_from_document", bytes = html.len()).entered();

        let scanned = markup::scan(html, contract);
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(scanned.cards.len());

        for card in scanned.cards {
            let Some(id) = card.id else {
                tracing::warn!(position = card.position, "skipping card without id attribute");
                continue;
            };
            let Some(genres) = card.genres else {
                tracing::warn!(id = %id, position = card.position, "skipping card without genres attribute");
                continue;
            };
            let (Some(title), Some(synopsis)) = (card.title, card.synopsis) else {
                tracing::warn!(id = %id, position = card.position, "skipping card without title or synopsis");
                continue;
            };
            let item = match Item::new(id, genres.split_whitespace(), title, synopsis) {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!(position = card.position, error = %e, "skipping malformed card");
                    continue;
                }
            };
            if !seen.insert(item.id.clone()) {
                tracing::warn!(id = %item.id, position = card.position, "skipping card with duplicate id");
                continue;
            }
            items.push(item);
        }

        tracing::debug!(
            items = items.len(),
            controls = scanned.controls.len(),
            theme_toggle = scanned.has_theme_toggle,
            main_content = scanned.has_main_content,
            "document imported"
        );

        Self {
            items: items.into(),
            controls: scanned.controls,
            has_theme_toggle: scanned.has_theme_toggle,
            has_main_content: scanned.has_main_content,
        }
    }

    /// Builds a registry from items that are already known, with one filter
    /// control per distinct genre (in first-seen order) after an "all" control.
    ///
    /// Items with a duplicated id are dropped after the first.
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut seen = HashSet::new();
        let items: Vec<Item> = items.into_iter().filter(|i| seen.insert(i.id.clone())).collect();

        let mut controls = vec![FilterControl {
            genre: GenreFilter::All,
            label: "All".to_string(),
        }];
        for genre in items.iter().flat_map(|i| i.genres.iter()) {
            let filter = GenreFilter::from(genre.as_str());
            if !controls.iter().any(|c| c.genre == filter) {
                controls.push(FilterControl {
                    genre: filter,
                    label: genre.clone(),
                });
            }
        }

        Self {
            items: items.into(),
            controls,
            has_theme_toggle: false,
            has_main_content: false,
        }
    }

    /// Shared handle to the items, in document order.
    #[must_use]
    pub fn items(&self) -> &Arc<[Item]> {
        &self.items
    }

    /// Filter controls, in document order.
    #[must_use]
    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the document exposes the theme toggle control.
    #[must_use]
    pub const fn has_theme_toggle(&self) -> bool {
        self.has_theme_toggle
    }

    /// Whether the document exposes the main content focus target.
    #[must_use]
    pub const fn has_main_content(&self) -> bool {
        self.has_main_content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Stories</title></head>
<body>
  <button id="theme-toggle" aria-label="Toggle theme">Theme</button>
  <nav>
    <button class="filter-btn active" data-filter="all">All</button>
    <button class="filter-btn" data-filter="horror">Horror</button>
    <button class="filter-btn" data-filter="drama">Drama &amp; More</button>
  </nav>
  <main id="main-content">
    <article class="story-card" data-story-id="1" data-genres="horror">
      <img src="a.jpg" alt="">
      <h3 class="story-title">The   Lantern</h3>
      <p class="story-synopsis">A keeper<br>sees a second light.</p>
    </article>
    <article class="story-card" data-story-id="2" data-genres="comedy drama">
      <h3 class="story-title">Second Act</h3>
      <p class="story-synopsis">Curtain&nbsp;call.</p>
    </article>
    <article class="story-card" data-story-id="3" data-genres="">
      <h3 class="story-title">Untagged</h3>
      <p class="story-synopsis">Skipped.</p>
    </article>
    <article class="story-card" data-story-id="4" data-genres="drama">
      <h3 class="story-title">No synopsis</h3>
    </article>
    <article class="story-card" data-story-id="2" data-genres="drama">
      <h3 class="story-title">Duplicate</h3>
      <p class="story-synopsis">Skipped.</p>
    </article>
    <article class="story-card" data-story-id="5" data-genres="Drama">
      <h3 class="story-title">Quiet</h3>
      <p class="story-synopsis">Kept.</p>
    </article>
  </main>
</body>
</html>"#;

    #[test]
    fn imports_valid_cards_in_document_order() {
        let registry = ItemRegistry::load_from_document(PAGE, &DocumentContract::default());
        let ids: Vec<&str> = registry.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "5"]);

        let first = &registry.items()[0];
        assert_eq!(first.title, "The Lantern");
        assert_eq!(first.synopsis, "A keeper sees a second light.");
        assert_eq!(registry.items()[1].genres, vec!["comedy", "drama"]);
        assert_eq!(registry.items()[1].synopsis, "Curtain\u{a0}call.");
        assert_eq!(registry.items()[2].genres, vec!["drama"]);
    }

    #[test]
    fn collects_controls_and_landmarks() {
        let registry = ItemRegistry::load_from_document(PAGE, &DocumentContract::default());
        let genres: Vec<&str> = registry.controls().iter().map(|c| c.genre.as_str()).collect();
        assert_eq!(genres, vec!["all", "horror", "drama"]);
        assert_eq!(registry.controls()[2].label, "Drama & More");
        assert!(registry.has_theme_toggle());
        assert!(registry.has_main_content());
    }

    #[test]
    fn honours_custom_contract() {
        let html = r#"<div data-id="x" data-tags="sci-fi"><b class="t">T</b><i class="s">S</i></div>"#;
        let contract = DocumentContract {
            item_id_attr: "data-id".to_string(),
            genres_attr: "data-tags".to_string(),
            title_class: "t".to_string(),
            synopsis_class: "s".to_string(),
            ..DocumentContract::default()
        };
        let registry = ItemRegistry::load_from_document(html, &contract);
        assert_eq!(registry.len(), 1);
        assert!(registry.items()[0].has_genre("sci-fi"));
    }

    #[test]
    fn from_items_derives_controls() {
        let items = vec![
            Item::new("1", ["horror"], "a", "b").unwrap(),
            Item::new("2", ["comedy", "drama"], "a", "b").unwrap(),
            Item::new("2", ["drama"], "dup", "b").unwrap(),
        ];
        let registry = ItemRegistry::from_items(items);
        assert_eq!(registry.len(), 2);
        let genres: Vec<&str> = registry.controls().iter().map(|c| c.genre.as_str()).collect();
        assert_eq!(genres, vec!["all", "horror", "comedy", "drama"]);
    }
}
