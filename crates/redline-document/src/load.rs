//! Reading and writing documents on disk.

use std::{fs, path::Path};

use serde_json::Value;

use crate::DocumentError;

/// Reads and parses the JSON document at `path`.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content, path)
}

/// Parses a JSON document, requiring an object at the root.
///
/// `path` is used only for error messages.
pub fn parse_document(content: &str, path: &Path) -> Result<Value, DocumentError> {
    let value: Value = serde_json::from_str(content).map_err(|source| DocumentError::ParseJson {
        path: path.to_path_buf(),
        source,
    })?;
    if !value.is_object() {
        return Err(DocumentError::NotAnObject {
            path: path.to_path_buf(),
        });
    }
    Ok(value)
}

/// Writes `document` to `path` as pretty-printed JSON with a trailing newline.
pub fn save_document(document: &Value, path: &Path) -> Result<(), DocumentError> {
    let mut content = serde_json::to_string_pretty(document).map_err(DocumentError::Serialize)?;
    content.push('\n');
    fs::write(path, content).map_err(|source| DocumentError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
