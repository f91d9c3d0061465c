//! Citation registry and formatter.
//!
//! # Architecture
//!
//! ```text
//! Bibliography::builtin()          literal key → entry table
//!     │
//!     └── CitationRegistry::from_document(bib, page.cited_keys(), scheme)
//!             │                    numbers keys by first appearance
//!             ├── lookup(key)      → Reference { key, entry, number }
//!             ├── render_marker()  → "[n]" or "[?]"
//!             └── preview_block()  → formatted text + raw BibTeX view
//! ```
//!
//! The registry is immutable once built. Unknown keys never fail a render:
//! markers degrade to a `[?]` placeholder and a `cite` diagnostic is logged.

mod data;
mod entry;
mod format;
mod marker;
mod registry;

pub use data::Bibliography;
pub use entry::{BibliographicEntry, CitationKey};
pub use format::{format_authors, format_entry, raw_entry_view};
pub use marker::{Marker, MarkerState, PreviewBlock, PreviewState};
pub use registry::{AnchorScheme, CitationRegistry, Reference};

use thiserror::Error;

/// Citation-related errors
#[derive(Debug, Error)]
pub enum CitationError {
    #[error("citation not found: `{0}`")]
    NotFound(CitationKey),

    #[error("citation `{key}` has an empty `{field}` field")]
    InvalidEntry {
        key: CitationKey,
        field: &'static str,
    },

    #[error("citation `{0}` is defined twice")]
    DuplicateKey(CitationKey),
}
