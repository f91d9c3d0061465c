//! Text renderings of a [`BibliographicEntry`].

use super::{BibliographicEntry, CitationKey};
use std::borrow::Cow;

/// Storage form of a page range separator
const PAGE_RANGE_SEP: &str = "--";
/// Rendered page range separator (en-dash)
const PAGE_RANGE_DASH: &str = "–";

/// Turn stored `Last, First[, Last2, First2...]` authors into prose.
///
/// The final comma is replaced by `" and "` once a second author exists.
/// This is a single substitution: with three or more authors the earlier
/// commas stay as they are. Nothing is replaced when the text after the
/// final comma is empty.
///
/// | Stored | Rendered |
/// |--------|----------|
/// | `Russell, Stuart` | `Russell, Stuart` |
/// | `Russell, Stuart, Norvig, Peter` | `Russell, Stuart, Norvig and Peter` |
pub fn format_authors(author: &str) -> Cow<'_, str> {
    if author.matches(',').count() < 2 {
        return Cow::Borrowed(author);
    }
    match author.rfind(',') {
        Some(pos) => {
            let (head, tail) = author.split_at(pos);
            let last = tail[1..].trim();
            if last.is_empty() {
                return Cow::Borrowed(author);
            }
            Cow::Owned(format!("{head} and {last}"))
        }
        None => Cow::Borrowed(author),
    }
}

/// Format an entry as a human-readable citation.
///
/// ```text
/// Book:    {authors} ({year}). {title}. {publisher}.
/// Article: {authors} ({year}). {title}. {journal}[, {volume}][({number})][, {pages}].
/// Misc:    {authors} ({year}). {title}.
/// ```
pub fn format_entry(entry: &BibliographicEntry) -> String {
    let mut text = format!(
        "{} ({}). {}.",
        format_authors(entry.author()),
        entry.year(),
        entry.title()
    );

    match entry {
        BibliographicEntry::Book { publisher, .. } => {
            text.push(' ');
            text.push_str(publisher);
            text.push('.');
        }
        BibliographicEntry::Article {
            journal,
            volume,
            number,
            pages,
            ..
        } => {
            text.push(' ');
            text.push_str(journal);
            if let Some(volume) = volume {
                text.push_str(", ");
                text.push_str(volume);
            }
            if let Some(number) = number {
                text.push('(');
                text.push_str(number);
                text.push(')');
            }
            if let Some(pages) = pages {
                text.push_str(", ");
                text.push_str(&pages.replacen(PAGE_RANGE_SEP, PAGE_RANGE_DASH, 1));
            }
            text.push('.');
        }
        BibliographicEntry::Misc { .. } => {}
    }

    text
}

/// BibTeX-like dump of the stored record, for the "Show BibTeX" disclosure.
///
/// ```text
/// @book{russell2019human,
///   author = {Russell, Stuart},
///   title = {Human Compatible: ...},
///   year = {2019},
///   publisher = {Viking Press}
/// }
/// ```
pub fn raw_entry_view(key: &CitationKey, entry: &BibliographicEntry) -> String {
    let mut fields = vec![
        ("author", entry.author()),
        ("title", entry.title()),
        ("year", entry.year()),
    ];
    match entry {
        BibliographicEntry::Book { publisher, .. } => fields.push(("publisher", publisher.as_str())),
        BibliographicEntry::Article { journal, .. } => fields.push(("journal", journal.as_str())),
        BibliographicEntry::Misc { .. } => {}
    }

    let body = fields
        .iter()
        .map(|(name, value)| format!("  {name} = {{{value}}}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("@{}{{{key},\n{body}\n}}", entry.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn russell() -> BibliographicEntry {
        BibliographicEntry::Book {
            author: "Russell, Stuart".into(),
            title: "Human Compatible: Artificial Intelligence and the Problem of Control".into(),
            publisher: "Viking Press".into(),
            year: "2019".into(),
        }
    }

    fn bengio() -> BibliographicEntry {
        BibliographicEntry::Article {
            author: "Bengio, Yoshua".into(),
            title: "International governance of AI research".into(),
            journal: "Nature Machine Intelligence".into(),
            volume: Some("6".into()),
            number: Some("2".into()),
            pages: Some("123--135".into()),
            year: "2024".into(),
        }
    }

    #[test]
    fn test_format_book() {
        assert_eq!(
            format_entry(&russell()),
            "Russell, Stuart (2019). Human Compatible: Artificial Intelligence and the Problem of Control. Viking Press."
        );
    }

    #[test]
    fn test_format_article() {
        assert_eq!(
            format_entry(&bengio()),
            "Bengio, Yoshua (2024). International governance of AI research. Nature Machine Intelligence, 6(2), 123–135."
        );
    }

    #[test]
    fn test_format_article_without_optional_fields() {
        let entry = BibliographicEntry::Article {
            author: "Buhl, Marie".into(),
            title: "Safety Cases for Frontier AI".into(),
            journal: "arXiv preprint arXiv:2410.21572".into(),
            volume: None,
            number: None,
            pages: None,
            year: "2024".into(),
        };
        assert_eq!(
            format_entry(&entry),
            "Buhl, Marie (2024). Safety Cases for Frontier AI. arXiv preprint arXiv:2410.21572."
        );
    }

    #[test]
    fn test_format_article_number_without_volume() {
        let entry = BibliographicEntry::Article {
            author: "Doe, Jane".into(),
            title: "On Things".into(),
            journal: "Journal of Stuff".into(),
            volume: None,
            number: Some("4".into()),
            pages: Some("1--2".into()),
            year: "2001".into(),
        };
        assert_eq!(
            format_entry(&entry),
            "Doe, Jane (2001). On Things. Journal of Stuff(4), 1–2."
        );
    }

    #[test]
    fn test_format_misc_uses_prefix_only() {
        let entry = BibliographicEntry::Misc {
            kind: "misc".into(),
            author: "Shevlane, Toby".into(),
            title: "Model Evaluation for Extreme Risks".into(),
            year: "2023".into(),
        };
        assert_eq!(
            format_entry(&entry),
            "Shevlane, Toby (2023). Model Evaluation for Extreme Risks."
        );
    }

    #[test]
    fn test_format_is_idempotent() {
        let entry = bengio();
        assert_eq!(format_entry(&entry), format_entry(&entry));
        let _ = format_entry(&russell());
        assert_eq!(format_entry(&entry), format_entry(&bengio()));
    }

    #[test]
    fn test_format_authors_single_author_unchanged() {
        assert_eq!(format_authors("Russell, Stuart"), "Russell, Stuart");
        assert_eq!(format_authors("Plato"), "Plato");
    }

    #[test]
    fn test_format_authors_two_authors() {
        assert_eq!(
            format_authors("Russell, Stuart, Norvig, Peter"),
            "Russell, Stuart, Norvig and Peter"
        );
    }

    #[test]
    fn test_format_authors_trailing_comma_unchanged() {
        assert_eq!(
            format_authors("Russell, Stuart, Norvig, Peter,"),
            "Russell, Stuart, Norvig, Peter,"
        );
        assert_eq!(format_authors("A, B, C,  "), "A, B, C,  ");
    }

    #[test]
    fn test_format_authors_only_last_comma() {
        assert_eq!(format_authors("A, B, C, D, E, F"), "A, B, C, D, E and F");
    }

    #[test]
    fn test_pages_en_dash_replaces_first_separator_only() {
        let entry = BibliographicEntry::Article {
            author: "Doe, Jane".into(),
            title: "T".into(),
            journal: "J".into(),
            volume: None,
            number: None,
            pages: Some("1--2--3".into()),
            year: "2001".into(),
        };
        assert!(format_entry(&entry).ends_with(", 1–2--3."));
    }

    #[test]
    fn test_raw_view_book() {
        let key = CitationKey::new("russell2019human");
        assert_eq!(
            raw_entry_view(&key, &russell()),
            "@book{russell2019human,\n  author = {Russell, Stuart},\n  title = {Human Compatible: Artificial Intelligence and the Problem of Control},\n  year = {2019},\n  publisher = {Viking Press}\n}"
        );
    }

    #[test]
    fn test_raw_view_article_uses_journal() {
        let key = CitationKey::new("bengio2024governance");
        let view = raw_entry_view(&key, &bengio());

        assert!(view.starts_with("@article{bengio2024governance,\n"));
        assert!(view.contains("  journal = {Nature Machine Intelligence}"));
        assert!(!view.contains("publisher"));
        assert!(view.ends_with("\n}"));
    }

    #[test]
    fn test_raw_view_misc_has_common_fields_only() {
        let key = CitationKey::new("shevlane2023evaluation");
        let entry = BibliographicEntry::Misc {
            kind: "misc".into(),
            author: "Shevlane, Toby".into(),
            title: "Model Evaluation for Extreme Risks".into(),
            year: "2023".into(),
        };
        let view = raw_entry_view(&key, &entry);

        assert!(view.starts_with("@misc{shevlane2023evaluation,"));
        assert!(view.contains("  year = {2023}\n}"));
        assert!(!view.contains("journal"));
    }
}
