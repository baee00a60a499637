//! Markup helpers: HTML detection, tag stripping, and text content

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// An opening or closing tag with a letter-led name, anywhere in the string
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("tag pattern is valid"));

/// Bracket-delimited fragments, plus a tag left open at the end of the input
static STRIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>|<[A-Za-z/!][^>]*$").expect("strip pattern is valid"));

/// How markup is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupEngine {
    /// Parse into a DOM tree (requires the `dom` feature)
    #[default]
    Dom,
    /// Remove tags with a regular expression; entities stay as written
    Regex,
}

impl MarkupEngine {
    /// The engine that will actually run when `self` is requested
    pub fn effective(self) -> Self {
        if self == MarkupEngine::Dom && !Self::dom_available() {
            debug!("DOM markup engine not compiled in, using regex fallback");
            return MarkupEngine::Regex;
        }
        self
    }

    /// Whether the DOM engine was compiled in
    pub fn dom_available() -> bool {
        cfg!(feature = "dom")
    }
}

/// How a rendering surface should treat a Document string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Render the string as markup
    Markup,
    /// Show it as literal text (canonical content goes through the extractor first)
    PlainText,
}

/// Heuristic check for markup
///
/// True when the string contains anything shaped like `<tag ...>` or
/// `</tag>`. This is not a grammar check: canonical JSON whose user text
/// contains something like `<b>` is classified as markup too.
pub fn looks_like_html(content: &str) -> bool {
    TAG_PATTERN.is_match(content)
}

/// Decide how a detail page should display a Document string
pub fn render_mode(content: &str) -> RenderMode {
    if looks_like_html(content) {
        RenderMode::Markup
    } else {
        RenderMode::PlainText
    }
}

/// Remove everything between `<` and `>` with a regular expression
///
/// A tag-like fragment still open at the end of the input is removed too,
/// the way a browser drops an unterminated tag.
pub fn strip_tags(content: &str) -> String {
    STRIP_PATTERN.replace_all(content, "").into_owned()
}

/// Readable text of a markup fragment
///
/// With the DOM engine this is the fragment's text content (entities
/// decoded, script and style bodies included as a browser would). With
/// the regex engine it is [`strip_tags`].
pub fn text_content(content: &str, engine: MarkupEngine) -> String {
    match engine.effective() {
        MarkupEngine::Dom => dom_text_content(content),
        MarkupEngine::Regex => strip_tags(content),
    }
}

#[cfg(feature = "dom")]
fn dom_text_content(content: &str) -> String {
    let fragment = scraper::Html::parse_fragment(content);
    fragment.root_element().text().collect()
}

#[cfg(not(feature = "dom"))]
fn dom_text_content(content: &str) -> String {
    strip_tags(content)
}

/// Collapse every whitespace run to a single space, without trimming
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
