//! Inline markup inside block text.
//!
//! | Syntax | Output |
//! |--------|--------|
//! | `**text**` | `<strong>text</strong>` |
//! | `*text*` | `<em>text</em>` |
//! | `[@key]` | citation marker for `key` |
//!
//! Everything else is HTML-escaped.

use crate::utils::html::escape_html;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[@([A-Za-z0-9_:.\-]+)\]").unwrap());
static RE_STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_EM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Citation keys in the order they appear in `text`.
pub fn cited_keys(text: &str) -> impl Iterator<Item = &str> {
    RE_CITATION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Render inline markup to HTML, asking `cite` for each citation marker.
pub fn render_inline(text: &str, mut cite: impl FnMut(&str) -> String) -> String {
    let escaped = escape_html(text);
    let strong = RE_STRONG.replace_all(&escaped, "<strong>$1</strong>");
    let em = RE_EM.replace_all(&strong, "<em>$1</em>");
    RE_CITATION
        .replace_all(&em, |caps: &Captures<'_>| cite(&caps[1]))
        .into_owned()
}
