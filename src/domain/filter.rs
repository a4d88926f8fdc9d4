//! Genre filter and the item visibility rule.

use super::item::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the "show everything" filter.
pub const ALL: &str = "all";

/// The active genre filter: either every item or a single genre tag.
///
/// Exactly one filter is active at any time. Converting from a string maps
/// `"all"` (case-insensitive) to [`GenreFilter::All`] and lowercases anything
/// else, matching how [`Item`] normalizes its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenreFilter {
    #[default]
    All,
    Genre(String),
}

impl GenreFilter {
    /// The visibility rule: `F == all || F ∈ item.genres`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyshelf::{GenreFilter, Item};
    ///
    /// let item = Item::new("2", ["comedy", "drama"], "t", "s")?;
    /// assert!(GenreFilter::from("drama").matches(&item));
    /// assert!(GenreFilter::All.matches(&item));
    /// assert!(!GenreFilter::from("horror").matches(&item));
    /// # Ok::<(), storyshelf::StoryshelfError>(())
    /// ```
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Genre(genre) => item.has_genre(genre),
        }
    }

    /// Returns the string identifier used in markup and event payloads.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Genre(genre) => genre,
        }
    }
}

impl From<&str> for GenreFilter {
    fn from(value: &str) -> Self {
        let tag = value.trim().to_lowercase();
        if tag.is_empty() || tag == ALL {
            Self::All
        } else {
            Self::Genre(tag)
        }
    }
}

impl From<String> for GenreFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<GenreFilter> for String {
    fn from(filter: GenreFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_case_insensitive() {
        assert_eq!(GenreFilter::from("ALL"), GenreFilter::All);
        assert_eq!(GenreFilter::from(""), GenreFilter::All);
        assert_eq!(GenreFilter::from("Drama"), GenreFilter::Genre("drama".into()));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&GenreFilter::from("horror")).unwrap();
        assert_eq!(json, "\"horror\"");
        let back: GenreFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, GenreFilter::All);
    }
}
