//! Attribute and class names the registry looks for in the host document.

use serde::{Deserialize, Serialize};

/// Where the document keeps the data the controllers consume.
///
/// Defaults match the listing page markup:
///
/// ```html
/// <button data-filter="horror">Horror</button>
/// <article data-story-id="1" data-genres="horror thriller">
///   <h3 class="story-title">The Lantern</h3>
///   <p class="story-synopsis">A keeper sees a second light.</p>
/// </article>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentContract {
    /// Attribute holding a card's stable identifier.
    pub item_id_attr: String,
    /// Attribute holding a card's whitespace-delimited genre tags.
    pub genres_attr: String,
    /// Class of the element holding a card's title text.
    pub title_class: String,
    /// Class of the element holding a card's synopsis text.
    pub synopsis_class: String,
    /// Attribute marking a filter control and naming its genre.
    pub filter_attr: String,
    /// Element id of the theme toggle control.
    pub theme_toggle_id: String,
    /// Element id of the main content region (keyboard focus target).
    pub main_content_id: String,
}

impl Default for DocumentContract {
    fn default() -> Self {
        Self {
            item_id_attr: "data-story-id".to_string(),
            genres_attr: "data-genres".to_string(),
            title_class: "story-title".to_string(),
            synopsis_class: "story-synopsis".to_string(),
            filter_attr: "data-filter".to_string(),
            theme_toggle_id: "theme-toggle".to_string(),
            main_content_id: "main-content".to_string(),
        }
    }
}
