//! Lenient HTML scanner.
//!
//! `quick-xml` is run with end-name checks disabled and unmatched end tags
//! allowed, and this module layers the HTML rules it lacks on top: void
//! elements never open a scope, and an end tag closes everything up to the
//! nearest open element with the same name. That is enough for the
//! server-rendered listing markup; script bodies containing `<` stop the scan
//! early (with a warning) and keep what was read so far.

use crate::domain::GenreFilter;
use crate::registry::contract::DocumentContract;
use crate::registry::FilterControl;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A card as found in markup, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    /// Zero-based position among cards in the document.
    pub position: usize,
    pub id: Option<String>,
    pub genres: Option<String>,
    pub title: Option<String>,
    pub synopsis: Option<String>,
}

/// Everything the scanner extracts from one document.
#[derive(Debug, Clone, Default)]
pub struct ScannedDocument {
    pub cards: Vec<CardDraft>,
    pub controls: Vec<FilterControl>,
    pub has_theme_toggle: bool,
    pub has_main_content: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Title,
    Synopsis,
    ControlLabel(usize),
}

/// Text being collected for an open element.
#[derive(Debug)]
struct Capture {
    depth: usize,
    target: Target,
    text: String,
}

/// An element's attributes, decoded.
struct Attrs {
    name: String,
    pairs: Vec<(String, String)>,
}

impl Attrs {
    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

struct Scanner<'c> {
    contract: &'c DocumentContract,
    stack: Vec<String>,
    card: Option<(usize, CardDraft)>,
    captures: Vec<Capture>,
    out: ScannedDocument,
}

/// Scans `html` for cards, filter controls and landmark elements.
pub fn scan(html: &str, contract: &DocumentContract) -> ScannedDocument {
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.expand_empty_elements = false;
    }

    let mut scanner = Scanner {
        contract,
        stack: Vec::new(),
        card: None,
        captures: Vec::new(),
        out: ScannedDocument::default(),
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let attrs = decode_attrs(&reader, &e);
                let is_void = VOID_ELEMENTS.contains(&attrs.name.as_str());
                scanner.open(&attrs);
                if is_void {
                    scanner.close_top();
                }
            }
            Ok(Event::Empty(e)) => {
                let attrs = decode_attrs(&reader, &e);
                scanner.open(&attrs);
                scanner.close_top();
            }
            Ok(Event::End(e)) => {
                let name = reader
                    .decoder()
                    .decode(e.name().as_ref())
                    .map(|n| n.to_ascii_lowercase())
                    .unwrap_or_default();
                scanner.close_named(&name);
            }
            Ok(Event::Text(e)) => {
                if !scanner.captures.is_empty() {
                    match reader.decoder().decode(&e) {
                        Ok(raw) => scanner.text(&unescape_html(&raw)),
                        Err(err) => tracing::debug!(error = %err, "undecodable text node"),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if !scanner.captures.is_empty() {
                    scanner.text(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "markup scan stopped early"
                );
                break;
            }
        }
    }

    while !scanner.stack.is_empty() {
        scanner.close_top();
    }
    scanner.out
}

fn decode_attrs(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Attrs {
    let decoder = reader.decoder();
    let name = decoder
        .decode(e.name().as_ref())
        .map(|n| n.to_ascii_lowercase())
        .unwrap_or_default();

    let pairs = e
        .html_attributes()
        .flatten()
        .filter_map(|attr| {
            let key = decoder.decode(attr.key.as_ref()).ok()?.to_ascii_lowercase();
            let raw = decoder.decode(&attr.value).ok()?;
            Some((key, unescape_html(&raw).into_owned()))
        })
        .collect();

    Attrs { name, pairs }
}

/// Resolves XML entities plus the few HTML ones that show up in copy.
///
/// An entity neither set knows is kept verbatim instead of failing the whole
/// text node.
fn unescape_html(raw: &str) -> Cow<'_, str> {
    match quick_xml::escape::unescape_with(raw, resolve_entity) {
        Ok(text) => text,
        Err(_) => Cow::Owned(unescape_known(raw)),
    }
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    quick_xml::escape::resolve_predefined_entity(entity).or(match entity {
        "nbsp" => Some("\u{a0}"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "hellip" => Some("\u{2026}"),
        "rsquo" => Some("\u{2019}"),
        "lsquo" => Some("\u{2018}"),
        "rdquo" => Some("\u{201d}"),
        "ldquo" => Some("\u{201c}"),
        "copy" => Some("\u{a9}"),
        _ => None,
    })
}

/// Unescapes entity by entity, leaving unknown or malformed ones as written.
fn unescape_known(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let end = tail[1..]
            .find(|c: char| c == ';' || c == '&' || c.is_whitespace())
            .map(|i| i + 1)
            .filter(|&i| tail.as_bytes()[i] == b';');

        match end {
            Some(end) => {
                let entity = &tail[..=end];
                match quick_xml::escape::unescape_with(entity, resolve_entity) {
                    Ok(text) => out.push_str(&text),
                    Err(_) => out.push_str(entity),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

impl Scanner<'_> {
    fn open(&mut self, attrs: &Attrs) {
        self.stack.push(attrs.name.clone());
        let depth = self.stack.len();
        let contract = self.contract;

        if let Some(id) = attrs.get("id") {
            if id == contract.theme_toggle_id {
                self.out.has_theme_toggle = true;
            }
            if id == contract.main_content_id {
                self.out.has_main_content = true;
            }
        }

        if let Some(genre) = attrs.get(&contract.filter_attr) {
            let index = self.out.controls.len();
            self.out.controls.push(FilterControl {
                genre: GenreFilter::from(genre),
                label: String::new(),
            });
            self.captures.push(Capture {
                depth,
                target: Target::ControlLabel(index),
                text: String::new(),
            });
        }

        let id = attrs.get(&contract.item_id_attr);
        let genres = attrs.get(&contract.genres_attr);
        if id.is_some() || genres.is_some() {
            if self.card.is_some() {
                tracing::debug!(id = ?id, "nested card ignored");
            } else {
                let draft = CardDraft {
                    position: self.out.cards.len(),
                    id: id.map(str::to_string),
                    genres: genres.map(str::to_string),
                    ..CardDraft::default()
                };
                self.card = Some((depth, draft));
            }
        }

        if self.card.is_some() {
            let target = if attrs.has_class(&contract.title_class) {
                Some(Target::Title)
            } else if attrs.has_class(&contract.synopsis_class) {
                Some(Target::Synopsis)
            } else {
                None
            };
            if let Some(target) = target {
                self.captures.push(Capture {
                    depth,
                    target,
                    text: String::new(),
                });
            }
        }
    }

    fn text(&mut self, text: &str) {
        for capture in &mut self.captures {
            capture.text.push(' ');
            capture.text.push_str(text);
        }
    }

    fn close_named(&mut self, name: &str) {
        let Some(index) = self.stack.iter().rposition(|open| open == name) else {
            tracing::trace!(name = %name, "end tag without open element");
            return;
        };
        while self.stack.len() > index {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        let depth = self.stack.len();
        if depth == 0 {
            return;
        }

        while self.captures.last().is_some_and(|c| c.depth == depth) {
            if let Some(capture) = self.captures.pop() {
                self.finish_capture(capture);
            }
        }

        if self.card.as_ref().is_some_and(|(card_depth, _)| *card_depth == depth) {
            if let Some((_, draft)) = self.card.take() {
                self.out.cards.push(draft);
            }
        }

        self.stack.pop();
    }

    fn finish_capture(&mut self, capture: Capture) {
        let text = capture.text.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
        match capture.target {
            Target::ControlLabel(index) => {
                if let Some(control) = self.out.controls.get_mut(index) {
                    control.label = text;
                }
            }
            Target::Title | Target::Synopsis => {
                let Some((_, draft)) = self.card.as_mut() else {
                    return;
                };
                let slot = if capture.target == Target::Title {
                    &mut draft.title
                } else {
                    &mut draft.synopsis
                };
                if slot.is_none() && !text.is_empty() {
                    *slot = Some(text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_from_unclosed_and_stray_tags() {
        let html = r#"<div data-story-id="a" data-genres="x">
            <h3 class="story-title">Title</span></h3>
            <p class="story-synopsis">Open paragraph
        </div>
        </section>
        <div data-story-id="b" data-genres="y"><h3 class="story-title">B</h3><p class="story-synopsis">b</p></div>"#;

        let doc = scan(html, &DocumentContract::default());
        assert_eq!(doc.cards.len(), 2);
        assert_eq!(doc.cards[0].title.as_deref(), Some("Title"));
        assert_eq!(doc.cards[0].synopsis.as_deref(), Some("Open paragraph"));
        assert_eq!(doc.cards[1].id.as_deref(), Some("b"));
        assert_eq!(doc.cards[1].position, 1);
    }

    #[test]
    fn valueless_attributes_are_accepted() {
        let html = r#"<button data-filter="comedy" disabled>Comedy</button>"#;
        let doc = scan(html, &DocumentContract::default());
        assert_eq!(doc.controls.len(), 1);
        assert_eq!(doc.controls[0].genre, GenreFilter::from("comedy"));
        assert_eq!(doc.controls[0].label, "Comedy");
    }

    #[test]
    fn entities_resolve_in_text_and_attributes() {
        let html = r#"<article data-story-id="s&amp;i" data-genres="drama">
            <h3 class="story-title">Salt &amp; Iron</h3>
            <p class="story-synopsis">&quot;Run,&quot; she said&hellip; &#39;now&#x27;</p>
        </article>
        <button data-filter="drama">Drama &amp; More</button>"#;

        let doc = scan(html, &DocumentContract::default());
        assert_eq!(doc.cards[0].id.as_deref(), Some("s&i"));
        assert_eq!(doc.cards[0].title.as_deref(), Some("Salt & Iron"));
        assert_eq!(
            doc.cards[0].synopsis.as_deref(),
            Some("\"Run,\" she said\u{2026} 'now'")
        );
        assert_eq!(doc.controls[0].label, "Drama & More");
    }

    #[test]
    fn unknown_entities_are_kept_verbatim() {
        assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_html("&frac12; cup &amp; &hellip;"), "&frac12; cup & \u{2026}");
        assert_eq!(unescape_html("fish & chips &lt;3"), "fish & chips <3");
        assert_eq!(unescape_html("dangling &amp"), "dangling &amp");
    }

    #[test]
    fn first_title_wins() {
        let html = r#"<div data-story-id="a" data-genres="x">
            <h3 class="story-title">One</h3><h3 class="story-title">Two</h3>
            <p class="story-synopsis">s</p></div>"#;
        let doc = scan(html, &DocumentContract::default());
        assert_eq!(doc.cards[0].title.as_deref(), Some("One"));
    }
}
