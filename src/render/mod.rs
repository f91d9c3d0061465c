//! Page rendering.
//!
//! # Layout
//!
//! ```text
//! <header>   title, subtitle, byline
//! <nav>      table of contents (sections + references)
//! <article>  sections → blocks → inline text with citation markers
//!            paper links (landing page only), notes
//!            reference list, footer rows, back link
//! previews   hidden tooltip bodies, one per reference
//! ```
//!
//! Each page gets its own [`CitationRegistry`], numbered by first appearance
//! of a citation in that page.

mod citation;

use crate::{
    citation::{Bibliography, CitationRegistry},
    config::SiteConfig,
    page::{Block, Page, SectionStyle, inline::render_inline},
    utils::html::escape_html,
};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Page shell (embedded at compile time)
const LAYOUT_TEMPLATE: &str = include_str!("../embed/layout.html");

/// Marker hover/focus script (embedded at compile time)
const MARKER_SCRIPT: &str = include_str!("../embed/marker.js");

/// Stylesheet written next to the pages
pub const STYLESHEET: &str = include_str!("../embed/style.css");

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([a-z]+)\}").unwrap());

/// A link to another page of the site.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub title: String,
    pub url: String,
}

/// Absolute URL of a page under the configured path prefix.
///
/// | slug | trailing_slash | URL |
/// |------|----------------|-----|
/// | `""` | any | `/papers/` |
/// | `essay` | true | `/papers/essay/` |
/// | `essay` | false | `/papers/essay.html` |
pub fn page_url(slug: &str, config: &SiteConfig) -> String {
    let prefix = config.url_prefix();
    match (slug.is_empty(), config.build.trailing_slash) {
        (true, _) => format!("{prefix}/"),
        (false, true) => format!("{prefix}/{slug}/"),
        (false, false) => format!("{prefix}/{slug}.html"),
    }
}

/// Render one page to a complete HTML document.
///
/// `others` lists the non-landing pages, linked from the landing page.
pub fn render_page(
    page: &Page,
    bib: &Bibliography,
    config: &SiteConfig,
    others: &[PageLink],
) -> String {
    let registry = CitationRegistry::from_document(bib, page.cited_keys(), config.build.anchor);
    let cite = |key: &str| citation::marker_html(&registry, key);

    let mut body = String::with_capacity(16 * 1024);
    body.push_str(&header_html(page));
    body.push_str(&toc_html(page, &registry));

    body.push_str("<article>\n");
    for section in &page.sections {
        let class = match section.style {
            SectionStyle::Plain => "section",
            SectionStyle::Abstract => "section abstract",
            SectionStyle::Callout => "section callout",
        };
        body.push_str(&format!(
            "<section id=\"{}\" class=\"{class}\">\n<h{level}>{}</h{level}>\n",
            escape_html(&section.id),
            escape_html(&section.title),
            level = section.level,
        ));
        for block in &section.blocks {
            body.push_str(&block_html(block, &cite));
        }
        body.push_str("</section>\n");
    }

    if page.is_index() && !others.is_empty() {
        body.push_str("<section class=\"papers\">\n<h3>Papers</h3>\n<ul>\n");
        for link in others {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape_html(&link.url),
                escape_html(&link.title)
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }

    if !page.notes.is_empty() {
        body.push_str("<div class=\"notes\">\n");
        for note in &page.notes {
            body.push_str(&format!("<p>{}</p>\n", render_inline(note, &cite)));
        }
        body.push_str("</div>\n");
    }

    body.push_str(&citation::references_html(&registry));

    if !page.footer.is_empty() {
        body.push_str("<div class=\"page-meta\">\n");
        for row in &page.footer {
            body.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>\n",
                escape_html(&row.label),
                escape_html(&row.value)
            ));
        }
        body.push_str("</div>\n");
    }

    if page.back_link {
        body.push_str(&format!(
            "<p class=\"back-link\"><a href=\"{}\">← Back to papers</a></p>\n",
            page_url("", config)
        ));
    }
    body.push_str("</article>\n");
    body.push_str(&citation::previews_html(&registry));

    let title = if page.is_index() && page.title.is_empty() {
        config.base.title.as_str()
    } else {
        page.title.as_str()
    };

    let script = if registry.is_empty() {
        String::new()
    } else {
        format!("<script>\n{MARKER_SCRIPT}</script>")
    };
    let canonical = config
        .base
        .url
        .as_deref()
        .map(|url| {
            format!(
                "<link rel=\"canonical\" href=\"{}{}\">",
                escape_html(url.trim_end_matches('/')),
                escape_html(&page_url(&page.slug, config))
            )
        })
        .unwrap_or_default();

    fill_template(
        LAYOUT_TEMPLATE,
        &[
            ("lang", escape_html(&config.base.language).as_str()),
            ("title", escape_html(title).as_str()),
            ("author", escape_html(&config.base.author).as_str()),
            ("description", escape_html(&config.base.description).as_str()),
            ("canonical", canonical.as_str()),
            ("stylesheet", format!("{}/style.css", config.url_prefix()).as_str()),
            ("script", script.as_str()),
            ("body", body.as_str()),
        ],
    )
}

/// Substitute `{name}` placeholders in one pass.
///
/// Substituted values are never scanned again, so a value containing
/// `{body}` stays literal. Unknown placeholders are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_owned(), |(_, value)| (*value).to_owned())
        })
        .into_owned()
}

fn header_html(page: &Page) -> String {
    let mut html = format!("<header>\n<h1>{}</h1>\n", escape_html(&page.title));
    if let Some(subtitle) = &page.subtitle {
        html.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape_html(subtitle)));
    }
    if !page.byline.is_empty() {
        let byline = page
            .byline
            .iter()
            .map(|item| format!("<span>{}</span>", escape_html(item)))
            .collect::<Vec<_>>()
            .join("<span>•</span>");
        html.push_str(&format!("<p class=\"byline\">{byline}</p>\n"));
    }
    html.push_str("</header>\n");
    html
}

fn toc_html(page: &Page, registry: &CitationRegistry) -> String {
    if page.sections.is_empty() {
        return String::new();
    }

    let mut html = String::from("<nav class=\"toc\">\n<h3>Table of Contents</h3>\n<ul>\n");
    for section in &page.sections {
        html.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            section.level,
            escape_html(&section.id),
            escape_html(&section.title)
        ));
    }
    if !registry.is_empty() {
        html.push_str("<li class=\"toc-level-2\"><a href=\"#references\">References</a></li>\n");
    }
    html.push_str("</ul>\n</nav>\n");
    html
}

fn block_html(block: &Block, cite: &impl Fn(&str) -> String) -> String {
    let inline = |text: &str| render_inline(text, cite);

    match block {
        Block::Paragraph { text } => format!("<p>{}</p>\n", inline(text)),
        Block::Heading { text } => format!("<h4>{}</h4>\n", inline(text)),
        Block::Quote { text } => format!("<blockquote><p>{}</p></blockquote>\n", inline(text)),
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let items: String = items
                .iter()
                .map(|item| format!("<li>{}</li>\n", inline(item)))
                .collect();
            format!("<{tag}>\n{items}</{tag}>\n")
        }
        Block::Table { header, rows } => {
            let head: String = header
                .iter()
                .map(|cell| format!("<th>{}</th>", inline(cell)))
                .collect();
            let body: String = rows
                .iter()
                .map(|row| {
                    let cells: String = row
                        .iter()
                        .map(|cell| format!("<td>{}</td>", inline(cell)))
                        .collect();
                    format!("<tr>{cells}</tr>\n")
                })
                .collect();
            format!(
                "<div class=\"table-wrap\"><table>\n<thead><tr>{head}</tr></thead>\n<tbody>\n{body}</tbody>\n</table></div>\n"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        citation::{AnchorScheme, PreviewState},
        page::builtin_pages,
    };

    fn paper() -> Page {
        builtin_pages().unwrap().remove(1)
    }

    fn render(page: &Page, config: &SiteConfig) -> String {
        let bib = Bibliography::builtin().unwrap();
        render_page(page, &bib, config, &[])
    }

    #[test]
    fn test_page_url() {
        let mut config = SiteConfig::default();
        assert_eq!(page_url("", &config), "/papers/");
        assert_eq!(page_url("essay", &config), "/papers/essay/");

        config.build.trailing_slash = false;
        assert_eq!(page_url("essay", &config), "/papers/essay.html");

        config.build.base_path = "".into();
        assert_eq!(page_url("", &config), "/");
    }

    #[test]
    fn test_render_paper_numbers_by_first_appearance() {
        let html = render(&paper(), &SiteConfig::default());

        assert!(html.contains("href=\"#ref-1\" data-preview=\"preview-ref-1\""));
        assert!(html.contains("<li id=\"ref-1\" value=\"1\">Russell, Stuart (2019)."));
        assert!(html.contains("<li id=\"ref-2\" value=\"2\">Bostrom, Nick (2014)."));
        assert!(html.contains("<li id=\"ref-3\" value=\"3\">Bengio, Yoshua (2024)."));
    }

    #[test]
    fn test_render_paper_key_anchors() {
        let mut config = SiteConfig::default();
        config.build.anchor = AnchorScheme::Key;
        let html = render(&paper(), &config);

        assert!(html.contains("href=\"#ref-bengio2024governance\""));
        assert!(html.contains("<li id=\"ref-bengio2024governance\""));
        assert!(!html.contains("id=\"ref-3\""));
    }

    #[test]
    fn test_render_paper_structure() {
        let html = render(&paper(), &SiteConfig::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<title>Systemic Existential Risks from Incremental AI Development</title>"));
        assert!(html.contains("<section id=\"abstract\" class=\"section abstract\">"));
        assert!(html.contains("<a href=\"#references\">References</a>"));
        assert!(html.contains("<strong>Deliberate misuse</strong>"));
        assert!(html.contains("<th>AI Replacement Risk</th>"));
        assert!(html.contains("<strong>Keywords:</strong>"));
        assert!(html.contains("<a href=\"/papers/\">← Back to papers</a>"));
        assert!(html.contains("href=\"/papers/style.css\""));
        assert!(html.contains("data-state"));
        assert!(html.contains("<script>"));
        assert!(!html.contains("rel=\"canonical\""));
    }

    #[test]
    fn test_render_unknown_citation_degrades() {
        let page = Page::from_str(
            r#"
            slug = "s"
            title = "T"
            [[sections]]
            id = "a"
            title = "A"
            [[sections.blocks]]
            type = "paragraph"
            text = "known [@russell2019human], unknown [@nobody1999nothing]"
            "#,
        )
        .unwrap();
        let html = render(&page, &SiteConfig::default());

        assert!(html.contains(">[1]</a>"));
        assert!(html.contains("data-key=\"nobody1999nothing\""));
        assert!(html.contains(">[?]</span>"));
        assert_eq!(html.matches("<li id=\"ref-").count(), 1);
    }

    #[test]
    fn test_render_page_without_citations_has_no_reference_list() {
        let page = Page::from_str("slug = \"s\"\ntitle = \"T\"\n[[sections]]\nid = \"a\"\ntitle = \"A\"").unwrap();
        let html = render(&page, &SiteConfig::default());

        assert!(!html.contains("id=\"references\""));
        assert!(!html.contains("class=\"citation-previews\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_index_links_papers() {
        let pages = builtin_pages().unwrap();
        let bib = Bibliography::builtin().unwrap();
        let others = [PageLink {
            title: "Systemic Risks".into(),
            url: "/papers/gradual-disempowerment/".into(),
        }];
        let html = render_page(&pages[0], &bib, &SiteConfig::default(), &others);

        assert!(html.contains("<a href=\"/papers/gradual-disempowerment/\">Systemic Risks</a>"));
        assert!(html.contains("<p class=\"subtitle\">Misaligned Economy</p>"));
        // landing page notes cite two entries
        assert!(html.contains("<li id=\"ref-2\" value=\"2\">Shevlane, Toby (2023)."));
        assert!(!html.contains("Back to papers"));
    }

    #[test]
    fn test_fill_template_is_single_pass() {
        let html = fill_template(
            "<meta content=\"{description}\">{body}{unknown}",
            &[("description", "{body}"), ("body", "<p>text</p>")],
        );
        assert_eq!(html, "<meta content=\"{body}\"><p>text</p>{unknown}");
    }

    #[test]
    fn test_config_values_do_not_expand_placeholders() {
        let mut config = SiteConfig::default();
        config.base.description = "{body}".into();
        let html = render(&paper(), &config);

        assert!(html.contains("<meta name=\"description\" content=\"{body}\">"));
        assert_eq!(html.matches("<section id=\"abstract\"").count(), 1);
    }

    #[test]
    fn test_canonical_link_from_base_url() {
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com/".into());
        let html = render(&paper(), &config);

        assert!(html.contains(
            "<link rel=\"canonical\" href=\"https://example.com/papers/gradual-disempowerment/\">"
        ));
    }

    #[test]
    fn test_marker_script_follows_marker_state_transitions() {
        for event in ["pointerenter", "pointerleave", "focus", "blur"] {
            assert!(MARKER_SCRIPT.contains(&format!("\"{event}\"")));
        }
        for state in [PreviewState::Open, PreviewState::Rest] {
            assert!(MARKER_SCRIPT.contains(&format!("\"data-state\", \"{}\"", state.as_attr())));
        }
    }
}
