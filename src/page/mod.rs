//! Essay pages.
//!
//! A page is a TOML document: metadata, then sections made of blocks.
//!
//! ```toml
//! slug = "gradual-disempowerment"
//! title = "Systemic Existential Risks from Incremental AI Development"
//! byline = ["Research Team", "July 20, 2024"]
//!
//! [[sections]]
//! id = "introduction"
//! title = "Introduction"
//!
//! [[sections.blocks]]
//! type = "paragraph"
//! text = "AI might pose an existential risk [@bostrom2014superintelligence]."
//! ```
//!
//! Pages come from `[build] content` when that directory exists, otherwise
//! the built-in pages are used.

pub mod inline;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;
use walkdir::WalkDir;

/// Id prefixes of reference-list entries and preview tooltips
const RESERVED_ID_PREFIXES: [&str; 2] = ["ref-", "preview-"];

/// Landing page (embedded at compile time)
const INDEX_PAGE: &str = include_str!("../embed/pages/index.toml");

/// The position paper (embedded at compile time)
const PAPER_PAGE: &str = include_str!("../embed/pages/gradual-disempowerment.toml");

/// Page-related errors
#[derive(Debug, Error)]
pub enum PageError {
    #[error("page parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("page `{page}` has a section without an id")]
    EmptySectionId { page: String },

    #[error("page `{page}` defines section `{id}` twice")]
    DuplicateSectionId { page: String, id: String },

    #[error("section `{id}` has heading level {level}, expected 2 or 3")]
    HeadingLevel { id: String, level: u8 },

    #[error("section id `references` is reserved for the reference list")]
    ReservedSectionId,

    #[error("section id `{id}` uses the `{prefix}` prefix reserved for citation anchors")]
    ReservedAnchorPrefix { id: String, prefix: &'static str },
}

/// One essay or landing page.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    /// Output directory name; empty for the landing page
    #[serde(default)]
    pub slug: String,

    pub title: String,

    #[serde(default)]
    pub subtitle: Option<String>,

    /// Items joined with a bullet under the title
    #[serde(default)]
    pub byline: Vec<String>,

    #[serde(default)]
    pub sections: Vec<Section>,

    /// Label/value rows below the reference list
    #[serde(default)]
    pub footer: Vec<FooterRow>,

    /// Plain notes at the bottom of the page (inline markup allowed)
    #[serde(default)]
    pub notes: Vec<String>,

    /// Show a link back to the landing page
    #[serde(default)]
    pub back_link: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Anchor id used by the table of contents
    pub id: String,

    pub title: String,

    /// Heading level, 2 or 3
    #[serde(default = "default_level")]
    pub level: u8,

    #[serde(default)]
    pub style: SectionStyle,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_level() -> u8 {
    2
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStyle {
    #[default]
    Plain,
    /// Bordered, italic abstract
    Abstract,
    /// Shaded pull-quote box
    Callout,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Paragraph {
        text: String,
    },
    Heading {
        text: String,
    },
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<String>,
    },
    Quote {
        text: String,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterRow {
    pub label: String,
    pub value: String,
}

impl Block {
    /// Inline texts of the block in document order.
    fn texts(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Paragraph { text } | Self::Heading { text } | Self::Quote { text } => {
                Box::new(std::iter::once(text.as_str()))
            }
            Self::List { items, .. } => Box::new(items.iter().map(String::as_str)),
            Self::Table { header, rows } => Box::new(
                header
                    .iter()
                    .chain(rows.iter().flatten())
                    .map(String::as_str),
            ),
        }
    }
}

impl Page {
    /// Parse and validate a page.
    pub fn from_str(content: &str) -> Result<Self, PageError> {
        let page: Page = toml::from_str(content)?;
        page.validate()?;
        Ok(page)
    }

    pub fn is_index(&self) -> bool {
        self.slug.is_empty()
    }

    /// Citation keys in document order, repeats included.
    pub fn cited_keys(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|section| section.blocks.iter())
            .flat_map(Block::texts)
            .chain(self.notes.iter().map(String::as_str))
            .flat_map(inline::cited_keys)
    }

    fn validate(&self) -> Result<(), PageError> {
        let mut seen = FxHashSet::default();

        for section in &self.sections {
            if section.id.trim().is_empty() {
                return Err(PageError::EmptySectionId {
                    page: self.title.clone(),
                });
            }
            if section.id == "references" {
                return Err(PageError::ReservedSectionId);
            }
            if let Some(prefix) = RESERVED_ID_PREFIXES
                .into_iter()
                .find(|prefix| section.id.starts_with(prefix))
            {
                return Err(PageError::ReservedAnchorPrefix {
                    id: section.id.clone(),
                    prefix,
                });
            }
            if !seen.insert(section.id.as_str()) {
                return Err(PageError::DuplicateSectionId {
                    page: self.title.clone(),
                    id: section.id.clone(),
                });
            }
            if !matches!(section.level, 2 | 3) {
                return Err(PageError::HeadingLevel {
                    id: section.id.clone(),
                    level: section.level,
                });
            }
        }

        Ok(())
    }
}

/// The pages compiled into the binary.
pub fn builtin_pages() -> Result<Vec<Page>> {
    [("index", INDEX_PAGE), ("gradual-disempowerment", PAPER_PAGE)]
        .into_iter()
        .map(|(name, content)| {
            Page::from_str(content).with_context(|| format!("Invalid built-in page `{name}`"))
        })
        .collect()
}

/// Load every `*.toml` page under `dir`, sorted by path.
pub fn load_pages(dir: &Path) -> Result<Vec<Page>> {
    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Page::from_str(&content).with_context(|| format!("Invalid page {}", path.display()))
        })
        .collect()
}
