//! Flattening structured CMS documents into checkable text, and mapping corrections back.
//!
//! A document is a JSON tree of rich-text fields and block lists. [`extract`] walks it in a
//! fixed order and produces one flat string for a language checker, together with the segment
//! map that ties every span of that string to the place in the tree it came from. Issues the
//! checker reports as flat-text offsets are turned back into edits with [`correct`], which:
//! - verifies the text at the offset and splices the owning text node in place
//! - reconciles offsets that drifted since the check by searching for the nearest occurrence
//! - falls back to a first-match search of the tree when no usable offset exists
//!
//! All offsets and lengths count Unicode scalar values, never bytes.

#![warn(missing_docs)]

mod apply;
mod correct;
mod error;
mod extract;
mod guards;
mod handle;
mod load;
mod locate;
mod richtext;
mod segment;
pub mod text;

pub use apply::{ApplyOutcome, apply};
pub use correct::{
    CorrectionRequest, CorrectionResult, Method, correct, correct_all, correct_with,
    legacy_search, nearest_occurrence, reconcile,
};
pub use error::DocumentError;
pub use extract::{DEFAULT_MAX_BLOCK_DEPTH, ExtractOptions, extract};
pub use guards::{DEFAULT_SKIP_KEYS, DEFAULT_TEXT_KEYS, TokenKind, classify_token, looks_like_prose};
pub use handle::Handle;
pub use load::{load_document, parse_document, save_document};
pub use locate::{Located, locate};
pub use richtext::{
    DEFAULT_MAX_DEPTH, DEFAULT_SKIP_TYPES, Rendered, RichTextNode, RichTextOptions, TextSpan,
    is_rich_text, walk,
};
pub use segment::{Extraction, SEPARATOR, Segment, SourceRef};
