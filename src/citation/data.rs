//! The literal bibliography table.

use super::{BibliographicEntry, CitationError, CitationKey};
use rustc_hash::FxHashMap;

/// Ordered key → entry table.
///
/// Insertion order is preserved; keys are unique and every entry passes
/// [`BibliographicEntry::validate`].
#[derive(Debug, Clone, Default)]
pub struct Bibliography {
    entries: Vec<(CitationKey, BibliographicEntry)>,
    index: FxHashMap<CitationKey, usize>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bibliography shipped with the site.
    pub fn builtin() -> Result<Self, CitationError> {
        let mut bib = Self::new();

        bib.insert(
            "russell2019human",
            BibliographicEntry::Book {
                author: "Russell, Stuart".into(),
                title: "Human Compatible: Artificial Intelligence and the Problem of Control".into(),
                publisher: "Viking Press".into(),
                year: "2019".into(),
            },
        )?;
        bib.insert(
            "bostrom2014superintelligence",
            BibliographicEntry::Book {
                author: "Bostrom, Nick".into(),
                title: "Superintelligence: Paths, Dangers, Strategies".into(),
                publisher: "Oxford University Press".into(),
                year: "2014".into(),
            },
        )?;
        bib.insert(
            "bengio2024governance",
            BibliographicEntry::Article {
                author: "Bengio, Yoshua".into(),
                title: "International governance of AI research".into(),
                journal: "Nature Machine Intelligence".into(),
                volume: Some("6".into()),
                number: Some("2".into()),
                pages: Some("123--135".into()),
                year: "2024".into(),
            },
        )?;
        bib.insert(
            "buhl2024safety",
            BibliographicEntry::Article {
                author: "Buhl, Marie Davidsen".into(),
                title: "Safety Cases for Frontier AI".into(),
                journal: "arXiv preprint arXiv:2410.21572".into(),
                volume: None,
                number: None,
                pages: None,
                year: "2024".into(),
            },
        )?;
        bib.insert(
            "shevlane2023evaluation",
            BibliographicEntry::Misc {
                kind: "misc".into(),
                author: "Shevlane, Toby".into(),
                title: "Model Evaluation for Extreme Risks".into(),
                year: "2023".into(),
            },
        )?;

        Ok(bib)
    }

    /// Add an entry, rejecting duplicate keys and incomplete records.
    pub fn insert(
        &mut self,
        key: impl Into<CitationKey>,
        entry: BibliographicEntry,
    ) -> Result<(), CitationError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(CitationError::DuplicateKey(key));
        }
        entry.validate(&key)?;

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, entry));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&BibliographicEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    #[allow(dead_code)] // Reserved API
    pub fn iter(&self) -> impl Iterator<Item = (&CitationKey, &BibliographicEntry)> {
        self.entries.iter().map(|(key, entry)| (key, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let bib = Bibliography::builtin().unwrap();
        assert_eq!(bib.len(), 5);
        assert!(bib.get("russell2019human").is_some());
        assert!(bib.get("bengio2024governance").is_some());
    }

    #[test]
    fn test_builtin_keeps_table_order() {
        let bib = Bibliography::builtin().unwrap();
        let keys: Vec<_> = bib.iter().map(|(key, _)| key.as_str()).take(3).collect();
        assert_eq!(
            keys,
            ["russell2019human", "bostrom2014superintelligence", "bengio2024governance"]
        );
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut bib = Bibliography::builtin().unwrap();
        let entry = bib.get("russell2019human").cloned().unwrap();

        let err = bib.insert("russell2019human", entry).unwrap_err();
        assert!(matches!(err, CitationError::DuplicateKey(_)));
        assert_eq!(bib.len(), 5);
    }

    #[test]
    fn test_insert_rejects_incomplete_entry() {
        let mut bib = Bibliography::new();
        let entry = BibliographicEntry::Misc {
            kind: "misc".into(),
            author: "Anonymous".into(),
            title: String::new(),
            year: "2020".into(),
        };

        assert!(bib.insert("anon2020", entry).is_err());
        assert_eq!(bib.len(), 0);
    }

    #[test]
    fn test_get_unknown_key() {
        let bib = Bibliography::builtin().unwrap();
        assert!(bib.get("nobody1999nothing").is_none());
    }
}
