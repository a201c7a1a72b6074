//! The persistence seam.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use serde_json::Value;

use crate::CheckError;

/// Loads documents and persists individual top-level fields.
///
/// `load` must return the same shape every time it is called for the same id; offsets
/// computed from one load are only valid against another load of the same shape.
pub trait DocumentStore {
    /// Loads the document `id`.
    fn load(&self, id: &str) -> Result<Value, CheckError>;

    /// Replaces top-level `field` of document `id` with `value`.
    fn save_field(&self, id: &str, field: &str, value: &Value) -> Result<(), CheckError>;
}

/// An in-memory store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Documents by id.
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document.
    pub fn insert(&self, id: impl Into<String>, document: Value) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), document);
    }

    /// Returns a copy of a stored document.
    pub fn get(&self, id: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Value, CheckError> {
        self.get(id).ok_or_else(|| CheckError::NotFound { id: id.into() })
    }

    fn save_field(&self, id: &str, field: &str, value: &Value) -> Result<(), CheckError> {
        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        let document = documents
            .get_mut(id)
            .ok_or_else(|| CheckError::NotFound { id: id.into() })?;
        let Some(fields) = document.as_object_mut() else {
            return Err(CheckError::Store {
                id: id.into(),
                message: "stored document is not an object".into(),
            });
        };
        fields.insert(field.to_string(), value.clone());
        Ok(())
    }
}
