//! Story card model.
//!
//! An [`Item`] is one card on the listing page. Items are collected once from the
//! rendered document by [`crate::registry::ItemRegistry`] and never change
//! afterwards.

use super::error::{Result, StoryshelfError};
use serde::{Deserialize, Serialize};

/// One content card: identity, genre tags, title and synopsis.
///
/// # Fields
///
/// - `id`: Stable identifier, unique within a registry
/// - `genres`: Non-empty list of genre tags, deduplicated, in markup order
/// - `title`: Card heading text
/// - `synopsis`: Card body text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub genres: Vec<String>,
    pub title: String,
    pub synopsis: String,
}

impl Item {
    /// Creates an item, validating the identity and genre invariants.
    ///
    /// Genre tags are trimmed, lowercased and deduplicated; the first
    /// occurrence keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`StoryshelfError::Markup`] if `id` is blank or no genre tag
    /// remains after normalization.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyshelf::Item;
    ///
    /// let item = Item::new("7", ["Drama", "comedy", "drama"], "Title", "Synopsis")?;
    /// assert_eq!(item.genres, vec!["drama", "comedy"]);
    /// assert!(Item::new("8", Vec::<String>::new(), "T", "S").is_err());
    /// # Ok::<(), storyshelf::StoryshelfError>(())
    /// ```
    pub fn new<I, S>(
        id: impl Into<String>,
        genres: I,
        title: impl Into<String>,
        synopsis: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(StoryshelfError::Markup("item id is empty".to_string()));
        }

        let mut tags: Vec<String> = Vec::new();
        for genre in genres {
            let tag = genre.as_ref().trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.is_empty() {
            return Err(StoryshelfError::Markup(format!("item {id} has no genres")));
        }

        Ok(Self {
            id,
            genres: tags,
            title: title.into(),
            synopsis: synopsis.into(),
        })
    }

    /// Returns `true` if the item is tagged with `genre`.
    #[must_use]
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
