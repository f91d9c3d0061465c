//! Bibliographic records and their keys.

use super::CitationError;
use std::{borrow::Borrow, fmt};

/// Opaque identifier of one bibliographic record, e.g. `russell2019human`.
///
/// Used both as a lookup key and, with [`AnchorScheme::Key`](super::AnchorScheme),
/// as the anchor target of the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CitationKey(String);

impl CitationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CitationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CitationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CitationKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// One reference, discriminated by its BibTeX entry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BibliographicEntry {
    Book {
        author: String,
        title: String,
        publisher: String,
        year: String,
    },
    Article {
        author: String,
        title: String,
        journal: String,
        volume: Option<String>,
        number: Option<String>,
        /// Page range in storage form, e.g. `123--135`
        pages: Option<String>,
        year: String,
    },
    /// Any other entry type (`misc`, `inproceedings`, ...).
    ///
    /// Carries only the common fields; formatting falls back to the
    /// `authors (year). title.` prefix.
    Misc {
        kind: String,
        author: String,
        title: String,
        year: String,
    },
}

impl BibliographicEntry {
    /// BibTeX entry type tag (`book`, `article`, or the stored misc kind).
    pub fn kind(&self) -> &str {
        match self {
            Self::Book { .. } => "book",
            Self::Article { .. } => "article",
            Self::Misc { kind, .. } => kind,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            Self::Book { author, .. } | Self::Article { author, .. } | Self::Misc { author, .. } => {
                author
            }
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Book { title, .. } | Self::Article { title, .. } | Self::Misc { title, .. } => {
                title
            }
        }
    }

    pub fn year(&self) -> &str {
        match self {
            Self::Book { year, .. } | Self::Article { year, .. } | Self::Misc { year, .. } => year,
        }
    }

    /// Check that `author`, `title` and `year` are non-empty.
    pub fn validate(&self, key: &CitationKey) -> Result<(), CitationError> {
        let required = [
            ("author", self.author()),
            ("title", self.title()),
            ("year", self.year()),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CitationError::InvalidEntry {
                key: key.clone(),
                field: *field,
            }),
            None => Ok(()),
        }
    }
}
