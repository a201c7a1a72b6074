//! Correction requests and drift reconciliation.
//!
//! A request is resolved in up to three steps, stopping at the first that applies:
//! 1. `offset`: the flat text at the reported offset still reads `original`
//! 2. `search`: it does not, so the occurrence of `original` nearest the reported offset is
//!    used instead
//! 3. `legacy`: no offset was given, or `original` no longer occurs in the flat text, so the
//!    first occurrence anywhere in the tree is replaced
//!
//! At most one edit is made per request. A request that fails every step leaves the
//! document untouched.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    apply::{ApplyOutcome, apply},
    extract::{ExtractOptions, extract},
    handle::Handle,
    locate::locate,
    richtext::RichTextNode,
    segment::{Extraction, Segment, SourceRef},
    text::{char_len, find_all_chars, find_chars, slice_chars},
};

/// A correction reported against the flat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionRequest {
    /// Text the checker flagged.
    pub original: String,
    /// Text to put in its place.
    pub replacement: String,
    /// Offset of `original` in the trimmed flat text, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Length of the flagged range; defaults to the length of `original`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Restricts the legacy search to one top-level field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl CorrectionRequest {
    /// Creates a request located at `offset`.
    pub fn at(offset: usize, original: impl Into<String>, replacement: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            length: Some(char_len(&original)),
            original,
            replacement: replacement.into(),
            offset: Some(offset),
            field: None,
        }
    }

    /// Creates a request without position information.
    pub fn unlocated(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            replacement: replacement.into(),
            offset: None,
            length: None,
            field: None,
        }
    }
}

/// Which step resolved (or last attempted) a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// The reported offset was still accurate.
    Offset,
    /// The nearest occurrence of the original text was used.
    Search,
    /// First-match search across the whole tree.
    Legacy,
}

/// Outcome of a correction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResult {
    /// Whether the document was changed.
    pub applied: bool,
    /// Top-level field to persist, when applied.
    pub modified_field: Option<String>,
    /// Step that produced this result.
    pub method: Method,
}

impl CorrectionResult {
    /// Builds a result from an apply outcome.
    fn from_outcome(outcome: ApplyOutcome, method: Method) -> Self {
        match outcome {
            ApplyOutcome::Applied { modified_field } => Self {
                applied: true,
                modified_field: Some(modified_field),
                method,
            },
            ApplyOutcome::Failed => Self::not_applied(method),
        }
    }

    /// Builds a result for a request that changed nothing.
    fn not_applied(method: Method) -> Self {
        Self {
            applied: false,
            modified_field: None,
            method,
        }
    }
}

/// Extracts `document` and applies one correction to it.
pub fn correct(
    document: &mut Value,
    request: &CorrectionRequest,
    options: &ExtractOptions,
) -> CorrectionResult {
    let extraction = extract(document, options);
    correct_with(document, &extraction, request, options)
}

/// Applies one correction using an extraction already taken from `document`.
pub fn correct_with(
    document: &mut Value,
    extraction: &Extraction,
    request: &CorrectionRequest,
    options: &ExtractOptions,
) -> CorrectionResult {
    let Some(offset) = request.offset else {
        return legacy_search(document, extraction, request, options);
    };
    let length = request.length.unwrap_or_else(|| char_len(&request.original));

    if extraction.slice(offset, length) == Some(request.original.as_str()) {
        return apply_at(document, extraction, offset, length, &request.replacement, options)
            .map_or(CorrectionResult::not_applied(Method::Offset), |outcome| {
                CorrectionResult::from_outcome(outcome, Method::Offset)
            });
    }

    debug!(
        offset,
        length,
        original = %request.original,
        "flat text at offset does not match, reconciling"
    );
    reconcile(document, extraction, request, offset, options)
}

/// Retries a mismatched request at the occurrence of `original` nearest `offset`.
///
/// Falls back to [`legacy_search`] when `original` does not occur in the flat text.
pub fn reconcile(
    document: &mut Value,
    extraction: &Extraction,
    request: &CorrectionRequest,
    offset: usize,
    options: &ExtractOptions,
) -> CorrectionResult {
    let Some(found) = nearest_occurrence(extraction.flat_text(), &request.original, offset) else {
        debug!(original = %request.original, "original not in flat text, using legacy search");
        return legacy_search(document, extraction, request, options);
    };

    debug!(reported = offset, found, "reconciled drifted offset");
    let length = char_len(&request.original);
    apply_at(document, extraction, found, length, &request.replacement, options).map_or(
        CorrectionResult::not_applied(Method::Search),
        |outcome| CorrectionResult::from_outcome(outcome, Method::Search),
    )
}

/// Replaces the first occurrence of `original` in the tree, in extraction order.
///
/// Inside rich text each text leaf is searched separately, so a match never straddles two
/// nodes. This path ignores offsets entirely; with short, common words it can pick an
/// occurrence other than the one the checker meant.
pub fn legacy_search(
    document: &mut Value,
    extraction: &Extraction,
    request: &CorrectionRequest,
    options: &ExtractOptions,
) -> CorrectionResult {
    if request.original.is_empty() {
        return CorrectionResult::not_applied(Method::Legacy);
    }
    let length = char_len(&request.original);

    for segment in extraction.segments() {
        if let Some(field) = &request.field
            && segment.source.top_field() != field
        {
            continue;
        }
        let Some(local_offset) = first_match(document, segment, &request.original, options) else {
            continue;
        };
        let outcome = apply(
            document,
            segment,
            local_offset,
            length,
            &request.replacement,
            &options.rich_text,
        );
        if outcome.is_applied() {
            return CorrectionResult::from_outcome(outcome, Method::Legacy);
        }
    }

    debug!(original = %request.original, "original not found anywhere in the document");
    CorrectionResult::not_applied(Method::Legacy)
}

/// Applies corrections in order of decreasing offset, re-extracting before each one.
///
/// Working from the end keeps the offsets of the remaining requests valid. Unlocated
/// requests go last. Results are returned in the order of `requests`.
pub fn correct_all(
    document: &mut Value,
    requests: &[CorrectionRequest],
    options: &ExtractOptions,
) -> Vec<CorrectionResult> {
    let mut order: Vec<usize> = (0..requests.len()).collect();
    order.sort_by_key(|&i| Reverse(requests[i].offset));

    let mut results = vec![None; requests.len()];
    for i in order {
        results[i] = Some(correct(document, &requests[i], options));
    }
    results
        .into_iter()
        .map(|result| result.unwrap_or(CorrectionResult::not_applied(Method::Legacy)))
        .collect()
}

/// Locates a flat-text range and applies the replacement to it.
///
/// Returns `None` when the range does not resolve to a segment.
fn apply_at(
    document: &mut Value,
    extraction: &Extraction,
    offset: usize,
    length: usize,
    replacement: &str,
    options: &ExtractOptions,
) -> Option<ApplyOutcome> {
    let located = locate(extraction, offset, length)?;
    Some(apply(
        document,
        located.segment,
        located.local_offset,
        length,
        replacement,
        &options.rich_text,
    ))
}

/// Returns the character offset of the occurrence of `needle` closest to `target`.
///
/// Ties go to the lower offset.
pub fn nearest_occurrence(haystack: &str, needle: &str, target: usize) -> Option<usize> {
    find_all_chars(haystack, needle)
        .into_iter()
        .min_by_key(|&position| (position.abs_diff(target), position))
}

/// Returns the local offset of the first occurrence of `needle` inside `segment`'s source.
fn first_match(
    document: &Value,
    segment: &Segment,
    needle: &str,
    options: &ExtractOptions,
) -> Option<usize> {
    match &segment.source {
        SourceRef::Title { .. } | SourceRef::PlainField { .. } => find_chars(&segment.text, needle),
        SourceRef::RichText { handle, .. } => {
            first_match_in_leaves(document, handle, needle, options)
        }
    }
}

/// Searches the text leaves of the rich-text subtree at `handle`, in rendering order.
fn first_match_in_leaves(
    document: &Value,
    handle: &Handle,
    needle: &str,
    options: &ExtractOptions,
) -> Option<usize> {
    let subtree = handle.resolve(document)?;
    let rendered = RichTextNode::parse(subtree, handle, &options.rich_text).render();
    rendered.spans.iter().find_map(|span| {
        let leaf = slice_chars(&rendered.text, span.start, span.len)?;
        find_chars(leaf, needle).map(|position| span.start + position)
    })
}
