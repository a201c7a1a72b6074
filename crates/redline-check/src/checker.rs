//! The checking-service seam.

use redline_document::{
    CorrectionRequest, Extraction,
    text::{char_len, slice_chars},
};
use serde::{Deserialize, Serialize};

use crate::CheckError;

/// One problem reported by a checker, located in the submitted flat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Character offset in the submitted text.
    pub offset: usize,
    /// Length of the flagged range in characters.
    pub length: usize,
    /// Human-readable explanation.
    #[serde(default)]
    pub message: String,
    /// Broad category, such as `TYPOS` or `GRAMMAR`.
    #[serde(default)]
    pub category: String,
    /// Identifier of the rule that fired.
    #[serde(default)]
    pub rule_id: String,
    /// Candidate replacements, best first.
    #[serde(default)]
    pub suggested_replacements: Vec<String>,
    /// The flagged text as the checker saw it, when the checker reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl Issue {
    /// Returns the flagged text: the reported original, or the covered flat-text range.
    pub fn covered_text<'a>(&'a self, flat_text: &'a str) -> Option<&'a str> {
        self.original
            .as_deref()
            .or_else(|| slice_chars(flat_text, self.offset, self.length))
    }

    /// Builds a correction request from the first suggested replacement.
    ///
    /// Returns `None` when there is no suggestion or the flagged text cannot be recovered.
    pub fn to_request(&self, extraction: &Extraction) -> Option<CorrectionRequest> {
        let replacement = self.suggested_replacements.first()?;
        let original = self.covered_text(extraction.flat_text())?;
        Some(CorrectionRequest {
            length: Some(char_len(original)),
            original: original.to_string(),
            replacement: replacement.clone(),
            offset: Some(self.offset),
            field: None,
        })
    }
}

/// A natural-language checking service.
///
/// Offsets in the returned issues must be relative to exactly the `text` passed in.
pub trait Checker {
    /// Checks `text` in `language`.
    fn check(&self, text: &str, language: &str) -> Result<Vec<Issue>, CheckError>;
}

/// Returns the longest prefix of `text` holding at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
