//! Addresses into an owned document tree.
//!
//! A `Handle` is a JSON pointer (RFC 6901) built during traversal. Because the document is
//! owned and only mutated through handles, a handle produced by one extraction pass stays
//! valid for the correction that follows it.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A JSON pointer into a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Returns the handle of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the handle of the member `key` of the object at this handle.
    pub fn key(&self, key: &str) -> Self {
        let escaped = key.replace('~', "~0").replace('/', "~1");
        Self(format!("{}/{escaped}", self.0))
    }

    /// Returns the handle of element `index` of the array at this handle.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}/{index}", self.0))
    }

    /// Returns the pointer string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the handle against a document.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        document.pointer(&self.0)
    }

    /// Resolves the handle against a document for mutation.
    pub fn resolve_mut<'a>(&self, document: &'a mut Value) -> Option<&'a mut Value> {
        document.pointer_mut(&self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}
