//! Segments and the flat text built from them.

use std::hash::{Hash, Hasher};

use serde::Serialize;
use siphasher::sip::SipHasher24;

use crate::{
    handle::Handle,
    text::{char_len, slice_chars},
};

/// Separator inserted between consecutive segments.
pub const SEPARATOR: char = '\n';

/// Where a segment's text lives in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SourceRef {
    /// The document's top-level title field.
    Title {
        /// Name of the title field.
        field: String,
    },
    /// A rich-text subtree.
    RichText {
        /// Top-level field the subtree belongs to.
        top_field: String,
        /// Location of the subtree.
        handle: Handle,
    },
    /// A scalar string inside a block.
    PlainField {
        /// Location of the object holding the field.
        parent: Handle,
        /// Key of the field within `parent`.
        key: String,
        /// Top-level field the block belongs to.
        top_field: String,
    },
}

impl SourceRef {
    /// Returns the top-level field that must be persisted when this source changes.
    pub fn top_field(&self) -> &str {
        match self {
            Self::Title { field } => field,
            Self::RichText { top_field, .. } | Self::PlainField { top_field, .. } => top_field,
        }
    }
}

/// A contiguous span of flat text and the source it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// The segment's text, exactly as contributed to the flat text.
    pub text: String,
    /// Where the text lives.
    pub source: SourceRef,
}

/// The result of extracting a document: flat text plus the segment map behind it.
///
/// Segment starts are measured in the untrimmed join; offsets reported against the trimmed
/// flat text are shifted by [`Extraction::trim_delta`] before lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Trimmed join of all segment texts.
    flat_text: String,
    /// Characters trimmed from the front of the join.
    trim_delta: usize,
    /// Non-empty segments in traversal order.
    segments: Vec<Segment>,
    /// Untrimmed character start of each segment.
    starts: Vec<usize>,
}

impl Extraction {
    /// Joins segments into flat text, dropping empty ones.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let segments: Vec<Segment> = segments.into_iter().filter(|s| !s.text.is_empty()).collect();

        let mut joined = String::new();
        let mut starts = Vec::with_capacity(segments.len());
        let mut position = 0;
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                joined.push(SEPARATOR);
                position += 1;
            }
            starts.push(position);
            joined.push_str(&segment.text);
            position += char_len(&segment.text);
        }

        let without_leading = joined.trim_start();
        let trim_delta = char_len(&joined[..joined.len() - without_leading.len()]);
        let flat_text = without_leading.trim_end().to_string();

        Self {
            flat_text,
            trim_delta,
            segments,
            starts,
        }
    }

    /// Returns the trimmed flat text submitted to the checker.
    pub fn flat_text(&self) -> &str {
        &self.flat_text
    }

    /// Returns the flat text length in characters.
    pub fn len(&self) -> usize {
        char_len(&self.flat_text)
    }

    /// Returns true if the document produced no checkable text.
    pub fn is_empty(&self) -> bool {
        self.flat_text.is_empty()
    }

    /// Returns the number of characters trimmed from the front of the join.
    pub fn trim_delta(&self) -> usize {
        self.trim_delta
    }

    /// Returns the segments in traversal order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the untrimmed start of segment `index`.
    pub fn start_of(&self, index: usize) -> Option<usize> {
        self.starts.get(index).copied()
    }

    /// Returns the index of the segment covering trimmed offset `offset`.
    ///
    /// Offsets on a separator belong to no segment.
    pub fn segment_at(&self, offset: usize) -> Option<usize> {
        let raw = offset.checked_add(self.trim_delta)?;
        self.spans()
            .position(|(start, segment)| raw >= start && raw < start + char_len(&segment.text))
    }

    /// Iterates over `(untrimmed start, segment)` pairs.
    pub fn spans(&self) -> impl Iterator<Item = (usize, &Segment)> {
        self.starts.iter().copied().zip(&self.segments)
    }

    /// Returns `len` characters of flat text starting at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&str> {
        slice_chars(&self.flat_text, offset, len)
    }

    /// Returns a stable hex fingerprint of the flat text.
    ///
    /// Two extractions with the same fingerprint share one coordinate system, so offsets
    /// reported against one are valid against the other.
    pub fn fingerprint(&self) -> String {
        let mut hasher = SipHasher24::new();
        self.flat_text.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}
