//! HTML for citation markers, previews and the reference list.

use crate::{
    citation::{CitationRegistry, Marker, MarkerState, format_entry},
    utils::html::escape_html,
};

/// Id of the preview element for a reference anchor
fn preview_id(anchor: &str) -> String {
    format!("preview-{anchor}")
}

/// In-text marker for `key`.
///
/// A resolved marker links to its reference-list anchor and names its
/// preview in `data-preview`; the page script toggles `data-state`.
/// An unresolved marker is an inert `[?]`.
pub fn marker_html(registry: &CitationRegistry, key: &str) -> String {
    let state = MarkerState::new(registry.render_marker(key));
    let label = state.marker().to_string();

    match state.marker() {
        Marker::Resolved { .. } => {
            let anchor = state.activate().unwrap_or_default();
            format!(
                r##"<a class="citation" href="#{anchor}" data-preview="{preview}" data-state="{state}" aria-describedby="{preview}">{label}</a>"##,
                preview = preview_id(anchor),
                state = state.preview().as_attr(),
            )
        }
        Marker::Unresolved { key } => format!(
            r#"<span class="citation citation-missing" data-key="{}" title="Citation not found">{label}</span>"#,
            escape_html(key),
        ),
    }
}

/// Hidden preview tooltips, one per reference.
pub fn previews_html(registry: &CitationRegistry) -> String {
    let mut html = String::new();
    if registry.is_empty() {
        return html;
    }

    html.push_str("<div class=\"citation-previews\" hidden>\n");
    for reference in registry.references() {
        let Ok(preview) = registry.preview_block(reference.key.as_str()) else {
            continue;
        };
        let anchor = registry.anchor_id(reference);
        html.push_str(&format!(
            concat!(
                r#"<div class="citation-preview" id="{id}" role="tooltip">"#,
                r#"<div class="citation-preview-label">Reference {number}</div>"#,
                r#"<div class="citation-preview-text">{text}</div>"#,
                r#"<details><summary>Show BibTeX</summary><pre>{raw}</pre></details>"#,
                "</div>\n"
            ),
            id = preview_id(&anchor),
            number = preview.number,
            text = escape_html(&preview.formatted_text),
            raw = escape_html(&preview.raw_entry_view),
        ));
    }
    html.push_str("</div>\n");
    html
}

/// The numbered reference list; every item carries its anchor id.
pub fn references_html(registry: &CitationRegistry) -> String {
    let mut html = String::new();
    if registry.is_empty() {
        return html;
    }

    html.push_str("<section id=\"references\" class=\"references\">\n<h3>References</h3>\n<ol>\n");
    for reference in registry.references() {
        html.push_str(&format!(
            "<li id=\"{}\" value=\"{}\">{}</li>\n",
            registry.anchor_id(reference),
            reference.number,
            escape_html(&format_entry(&reference.entry)),
        ));
    }
    html.push_str("</ol>\n</section>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::{AnchorScheme, Bibliography};

    fn registry(scheme: AnchorScheme) -> CitationRegistry {
        let bib = Bibliography::builtin().unwrap();
        CitationRegistry::from_document(
            &bib,
            ["russell2019human", "bengio2024governance"],
            scheme,
        )
    }

    #[test]
    fn test_marker_html_resolved() {
        let html = marker_html(&registry(AnchorScheme::Number), "bengio2024governance");

        assert!(html.starts_with("<a class=\"citation\""));
        assert!(html.contains("href=\"#ref-2\""));
        assert!(html.contains("data-preview=\"preview-ref-2\""));
        assert!(html.contains("data-state=\"rest\""));
        assert!(html.ends_with(">[2]</a>"));
    }

    #[test]
    fn test_marker_html_unresolved() {
        let html = marker_html(&registry(AnchorScheme::Number), "nobody<1999>");

        assert!(html.contains("citation-missing"));
        assert!(html.contains("data-key=\"nobody&lt;1999&gt;\""));
        assert!(html.ends_with(">[?]</span>"));
        assert!(!html.contains("href"));
    }

    #[test]
    fn test_marker_targets_exist_in_reference_list() {
        for scheme in [AnchorScheme::Number, AnchorScheme::Key] {
            let registry = registry(scheme);
            let list = references_html(&registry);

            for key in ["russell2019human", "bengio2024governance"] {
                let marker = registry.render_marker(key);
                let anchor = marker.anchor().unwrap();
                assert_eq!(list.matches(&format!("id=\"{anchor}\"")).count(), 1);
            }
        }
    }

    #[test]
    fn test_references_html_uses_formatted_text() {
        let html = references_html(&registry(AnchorScheme::Number));

        assert!(html.contains("<li id=\"ref-1\" value=\"1\">Russell, Stuart (2019)."));
        assert!(html.contains("6(2), 123–135.</li>"));
    }

    #[test]
    fn test_previews_html() {
        let html = previews_html(&registry(AnchorScheme::Key));

        assert!(html.contains("id=\"preview-ref-bengio2024governance\""));
        assert!(html.contains("Reference 2"));
        assert!(html.contains("<summary>Show BibTeX</summary>"));
        assert!(html.contains("@book{russell2019human,"));
        assert_eq!(html.matches("class=\"citation-preview\"").count(), 2);
    }

    #[test]
    fn test_empty_registry_renders_nothing() {
        let bib = Bibliography::builtin().unwrap();
        let registry = CitationRegistry::from_document(&bib, Vec::<&str>::new(), AnchorScheme::Number);

        assert!(references_html(&registry).is_empty());
        assert!(previews_html(&registry).is_empty());
    }
}
