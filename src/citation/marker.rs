//! In-text citation markers and their preview state.

use super::{CitationError, CitationRegistry, format_entry, raw_entry_view};
use crate::log;
use std::fmt;

/// Placeholder shown for a key that is not in the registry
const UNRESOLVED_MARKER: &str = "[?]";

/// The bracketed in-text marker for one citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `[n]`, linked to the reference-list entry with id `anchor`
    Resolved { number: usize, anchor: String },
    /// `[?]`, not linked anywhere
    Unresolved { key: String },
}

impl Marker {
    /// Anchor the marker jumps to, if any.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::Resolved { anchor, .. } => Some(anchor),
            Self::Unresolved { .. } => None,
        }
    }

    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { number, .. } => write!(f, "[{number}]"),
            Self::Unresolved { .. } => f.write_str(UNRESOLVED_MARKER),
        }
    }
}

/// Tooltip content shown while a marker is hovered or focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBlock {
    pub number: usize,
    /// Output of [`format_entry`]
    pub formatted_text: String,
    /// Output of [`raw_entry_view`]
    pub raw_entry_view: String,
}

impl CitationRegistry {
    /// Marker for `key`, degrading to `[?]` when the key is unknown.
    ///
    /// Never fails: a missing key is logged as a `cite` diagnostic.
    pub fn render_marker(&self, key: &str) -> Marker {
        match self.lookup(key) {
            Ok(reference) => Marker::Resolved {
                number: reference.number,
                anchor: self.anchor_id(reference),
            },
            Err(err) => {
                log!("cite"; "{err}");
                Marker::Unresolved { key: key.to_owned() }
            }
        }
    }

    pub fn preview_block(&self, key: &str) -> Result<PreviewBlock, CitationError> {
        let reference = self.lookup(key)?;
        Ok(PreviewBlock {
            number: reference.number,
            formatted_text: format_entry(&reference.entry),
            raw_entry_view: raw_entry_view(&reference.key, &reference.entry),
        })
    }
}

/// Visual state of a marker's preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Rest,
    Open,
}

impl PreviewState {
    /// Value of the `data-state` attribute in rendered HTML.
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Open => "open",
        }
    }
}

/// Local interaction state of one marker instance.
///
/// Each marker owns its state; nothing is shared between markers on a page.
/// The embedded page script mirrors these transitions on `data-state`.
#[derive(Debug, Clone)]
pub struct MarkerState {
    marker: Marker,
    preview: PreviewState,
}

impl MarkerState {
    pub fn new(marker: Marker) -> Self {
        Self {
            marker,
            preview: PreviewState::Rest,
        }
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub const fn preview(&self) -> PreviewState {
        self.preview
    }

    /// Click or keyboard activation: the anchor to scroll into view.
    ///
    /// `None` for an unresolved marker, which makes activation a no-op.
    pub fn activate(&self) -> Option<&str> {
        self.marker.anchor()
    }
}

/// Pointer and focus transitions.
///
/// Reference model of `embed/marker.js`: the exported page never calls these,
/// the script applies the same transitions to `data-state`. Tests pin the
/// behaviour the script has to follow.
#[allow(dead_code)] // Reserved API
impl MarkerState {
    pub fn is_preview_visible(&self) -> bool {
        self.preview == PreviewState::Open
    }

    pub fn pointer_enter(&mut self) {
        self.open();
    }

    pub fn pointer_leave(&mut self) {
        self.preview = PreviewState::Rest;
    }

    pub fn focus(&mut self) {
        self.open();
    }

    pub fn blur(&mut self) {
        self.preview = PreviewState::Rest;
    }

    // An unresolved marker has nothing to preview.
    fn open(&mut self) {
        if self.marker.is_resolved() {
            self.preview = PreviewState::Open;
        }
    }
}
