//! Error types for checking and fixing.

use redline_document::DocumentError;
use thiserror::Error;

/// Errors raised by collaborators while checking or fixing documents.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The checking service failed.
    #[error("checker failed: {0}")]
    Checker(String),

    /// The document store has no document with this id.
    #[error("document not found: {id}")]
    NotFound {
        /// Requested document id.
        id: String,
    },

    /// The document store failed.
    #[error("document store failed for {id}: {message}")]
    Store {
        /// Document id involved.
        id: String,
        /// Store-specific description.
        message: String,
    },

    /// The allow-list source failed.
    #[error("allow-list fetch failed: {0}")]
    AllowList(String),

    /// A document could not be read or written.
    #[error(transparent)]
    Document(#[from] DocumentError),
}
