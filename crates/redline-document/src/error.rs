//! Error types for document loading.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading or saving documents.
///
/// Only I/O and top-level shape problems are errors. Anything unexpected inside a document is
/// absorbed by extraction.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse a file as JSON.
    #[error("failed to parse {path} as JSON: {source}")]
    ParseJson {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The document root is not a JSON object.
    #[error("document root is not an object: {path}")]
    NotAnObject {
        /// Path to the offending file.
        path: PathBuf,
    },

    /// Failed to serialize a document.
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to write a file.
    #[error("failed to write file {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
