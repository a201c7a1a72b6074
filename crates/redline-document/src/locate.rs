//! Mapping flat-text offsets back to segments.

use crate::segment::{Extraction, Segment};

/// A flat-text offset resolved to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    /// Index of the owning segment.
    pub index: usize,
    /// The owning segment.
    pub segment: &'a Segment,
    /// Offset of the requested position inside the segment's text.
    pub local_offset: usize,
}

/// Resolves an offset in the trimmed flat text to the segment containing it.
///
/// Returns `None` when `[offset, offset + length)` leaves the flat text, or when `offset`
/// falls on a separator between segments.
pub fn locate(extraction: &Extraction, offset: usize, length: usize) -> Option<Located<'_>> {
    if offset
        .checked_add(length)
        .is_none_or(|end| end > extraction.len())
    {
        return None;
    }

    let index = extraction.segment_at(offset)?;
    let start = extraction.start_of(index)?;
    let segment = extraction.segments().get(index)?;
    Some(Located {
        index,
        segment,
        local_offset: offset + extraction.trim_delta() - start,
    })
}
