//! Plain-terminal rendering of the page model.
//!
//! Used by the terminal driver. Browser hosts render [`PageModel`](crate::ui::PageModel)
//! themselves and never call this.

use crate::app::AppState;
use crate::domain::error::Result;
use crate::ui::page::DisplayState;
use crate::ui::theme::Palette;
use std::io::Write;

/// Writes the current page to `out`.
///
/// Hidden cards are left out; fading cards are drawn struck through. The
/// pressed filter control is bracketed.
///
/// # Errors
///
/// Returns an error if writing fails or the palette cannot be loaded.
pub fn render(state: &AppState, out: &mut impl Write) -> Result<()> {
    let theme = state.page.theme_attribute().unwrap_or_default();
    let palette = Palette::for_theme(theme)?;
    let colors = &palette.colors;
    let reset = Palette::reset();

    writeln!(
        out,
        "{}{}Stories{} {}[{theme}]{reset}",
        Palette::bold(),
        Palette::fg(&colors.heading_fg),
        reset,
        Palette::dim(),
    )?;

    write!(out, "{}Filters:{reset}", Palette::fg(&colors.text_dim))?;
    for (index, control) in state.registry.controls().iter().enumerate() {
        let label = if control.label.is_empty() {
            control.genre.as_str()
        } else {
            control.label.as_str()
        };
        if &control.genre == state.page.pressed_filter() {
            write!(out, " {}[{} {label}]{reset}", Palette::fg(&colors.accent), index + 1)?;
        } else {
            write!(out, " {}{}{reset} {label}", Palette::dim(), index + 1)?;
        }
    }
    writeln!(out)?;

    for card in state.page.cards() {
        match card.state {
            DisplayState::Shown => {
                writeln!(out, "  {}{}{reset}", Palette::fg(&colors.text_normal), card.title)?;
            }
            DisplayState::Hiding => {
                writeln!(
                    out,
                    "  {}{}{}{reset}",
                    Palette::fg(&colors.card_hiding),
                    Palette::strike(),
                    card.title
                )?;
            }
            DisplayState::Hidden => {}
        }
    }

    let status = state.page.live_region().message();
    if !status.is_empty() {
        writeln!(out, "{}{status}{reset}", Palette::fg(&colors.text_dim))?;
    }

    if let Some(focused) = state.page.focused() {
        writeln!(out, "{}focus → #{focused}{reset}", Palette::fg(&colors.accent))?;
    }

    for notice in state.notifications.visible() {
        writeln!(
            out,
            "{}{}[{}] {}{reset}",
            Palette::bold(),
            Palette::fg(palette.notice(notice.kind)),
            notice.id,
            notice.message
        )?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{handle_event, Event};
    use crate::domain::{ColorScheme, GenreFilter, Item};
    use crate::registry::ItemRegistry;
    use crate::storage::Preferences;
    use crate::Config;

    #[test]
    fn renders_visible_cards_and_status() {
        let registry = ItemRegistry::from_items(vec![
            Item::new("1", ["horror"], "The Lantern", "s").unwrap(),
            Item::new("2", ["drama"], "Second Act", "s").unwrap(),
        ]);
        let config = Config {
            hide_delay_ms: 0,
            ..Config::default()
        };
        let mut state = AppState::new(&config, registry, Preferences::unavailable(), ColorScheme::Dark);
        handle_event(&mut state, &Event::SelectFilter(GenreFilter::from("drama")));

        let mut out = Vec::new();
        render(&state, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[dark]"));
        assert!(text.contains("Second Act"));
        assert!(!text.contains("The Lantern"));
        assert!(text.contains("Showing 1 stories for drama filter"));
    }
}
