//! Per-page citation registry with stable display numbers.

use super::{Bibliography, BibliographicEntry, CitationError, CitationKey};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How reference-list anchors are addressed.
///
/// Markers and reference-list entries derive their anchor from the same
/// scheme, so a marker always points at exactly one list entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorScheme {
    /// `ref-3` (default)
    #[default]
    Number,
    /// `ref-bengio2024governance`
    Key,
}

/// A resolved citation: the stored record plus its 1-based display number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub key: CitationKey,
    pub entry: BibliographicEntry,
    pub number: usize,
}

/// Immutable `key → (entry, display number)` mapping for one page.
#[derive(Debug, Clone, Default)]
pub struct CitationRegistry {
    references: Vec<Reference>,
    index: FxHashMap<CitationKey, usize>,
    scheme: AnchorScheme,
}

impl CitationRegistry {
    /// Register every bibliography entry, numbered in table order.
    #[allow(dead_code)] // Reserved API
    pub fn from_bibliography(bib: &Bibliography, scheme: AnchorScheme) -> Self {
        Self::from_document(bib, bib.iter().map(|(key, _)| key.as_str()), scheme)
    }

    /// Register the keys a document cites, numbered by first appearance.
    ///
    /// Repeated keys keep their first number. Keys missing from the
    /// bibliography are skipped here and surface later as `[?]` markers.
    pub fn from_document<'a>(
        bib: &Bibliography,
        cited: impl IntoIterator<Item = &'a str>,
        scheme: AnchorScheme,
    ) -> Self {
        let mut registry = Self {
            scheme,
            ..Self::default()
        };

        for key in cited {
            if registry.index.contains_key(key) {
                continue;
            }
            let Some(entry) = bib.get(key) else {
                continue;
            };

            let key = CitationKey::new(key);
            let number = registry.references.len() + 1;
            registry.index.insert(key.clone(), registry.references.len());
            registry.references.push(Reference {
                key,
                entry: entry.clone(),
                number,
            });
        }

        registry
    }

    /// Resolve a citation key.
    pub fn lookup(&self, key: &str) -> Result<&Reference, CitationError> {
        self.index
            .get(key)
            .map(|&i| &self.references[i])
            .ok_or_else(|| CitationError::NotFound(CitationKey::new(key)))
    }

    /// Anchor id of a reference-list entry under this registry's scheme.
    pub fn anchor_id(&self, reference: &Reference) -> String {
        match self.scheme {
            AnchorScheme::Number => format!("ref-{}", reference.number),
            AnchorScheme::Key => format!("ref-{}", reference.key),
        }
    }

    /// References in display-number order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
