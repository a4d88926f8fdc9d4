//! Filesystem locations for persisted data.

use std::path::PathBuf;

/// File name of the preference store inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Returns the storyshelf data directory.
///
/// `$XDG_DATA_HOME/storyshelf` when set, otherwise
/// `$HOME/.local/share/storyshelf`. `None` if neither variable is usable.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    let from_xdg = std::env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .filter(|p| p.is_absolute());

    from_xdg
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .map(|base| base.join("storyshelf"))
}

/// Default location of the JSON preference file.
#[must_use]
pub fn default_preferences_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(PREFERENCES_FILE))
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~`, or with no home directory available, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use storyshelf::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path").to_str(), Some("/absolute/path"));
/// assert_eq!(expand_tilde("relative/~").to_str(), Some("relative/~"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
