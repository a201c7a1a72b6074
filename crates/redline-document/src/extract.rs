//! Segment extraction.
//!
//! [`extract`] is the only traversal that decides what text a document contributes and in
//! which order. Checking and correcting both go through it, so the coordinate system the
//! checker reports in is always the one corrections are resolved against.
//!
//! Order:
//! 1. the title field, if it is a non-empty string
//! 2. the hero field, if present
//! 3. the content field
//! 4. each block field, recursively scanned for rich-text subtrees and prose scalars

use std::{collections::HashSet, iter};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    guards::{DEFAULT_SKIP_KEYS, DEFAULT_TEXT_KEYS, classify_token},
    handle::Handle,
    richtext::{RichTextNode, RichTextOptions, is_rich_text},
    segment::{Extraction, Segment, SourceRef},
};

/// Default recursion budget for the block graph.
pub const DEFAULT_MAX_BLOCK_DEPTH: usize = 10;

/// Options controlling which parts of a document are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Top-level title field.
    pub title_field: String,
    /// Top-level hero field, scanned after the title.
    pub hero_field: Option<String>,
    /// Top-level primary rich-text field.
    pub content_field: String,
    /// Top-level block list fields, scanned in order.
    pub block_fields: Vec<String>,
    /// Keys whose string values are submitted as prose.
    pub text_keys: Vec<String>,
    /// Keys never descended into or submitted.
    pub skip_keys: Vec<String>,
    /// Rich-text recognition options.
    pub rich_text: RichTextOptions,
    /// Maximum nesting depth inside block fields.
    pub max_block_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            title_field: "title".into(),
            hero_field: Some("hero".into()),
            content_field: "content".into(),
            block_fields: vec!["layout".into()],
            text_keys: DEFAULT_TEXT_KEYS.iter().map(|k| (*k).to_string()).collect(),
            skip_keys: DEFAULT_SKIP_KEYS.iter().map(|k| (*k).to_string()).collect(),
            rich_text: RichTextOptions::default(),
            max_block_depth: DEFAULT_MAX_BLOCK_DEPTH,
        }
    }
}

impl ExtractOptions {
    /// Returns a copy of these options with a different content field.
    pub fn with_content_field(mut self, field: impl Into<String>) -> Self {
        self.content_field = field.into();
        self
    }
}

/// Extracts the flat text and segment map of a document.
///
/// Never fails. A non-object document, or any field of an unexpected shape, simply
/// contributes nothing.
pub fn extract(document: &Value, options: &ExtractOptions) -> Extraction {
    let Some(root) = document.as_object() else {
        debug!("document root is not an object, nothing to extract");
        return Extraction::from_segments(Vec::new());
    };

    let mut extractor = Extractor::new(options);
    extractor.title(root);

    let mut visited: Vec<&str> = vec![options.title_field.as_str()];
    let top_fields = options
        .hero_field
        .iter()
        .chain(iter::once(&options.content_field))
        .chain(&options.block_fields);
    for field in top_fields {
        if visited.contains(&field.as_str()) {
            debug!(field = %field, "field already extracted, skipping duplicate");
            continue;
        }
        visited.push(field);
        if let Some(value) = root.get(field) {
            extractor.top_field(field, value);
        }
    }

    Extraction::from_segments(extractor.segments)
}

/// Traversal state for one extraction.
struct Extractor<'a> {
    /// Options in effect.
    options: &'a ExtractOptions,
    /// Keys whose string values are prose.
    text_keys: HashSet<&'a str>,
    /// Keys that are never visited.
    skip_keys: HashSet<&'a str>,
    /// Segments collected so far.
    segments: Vec<Segment>,
}

impl<'a> Extractor<'a> {
    /// Creates an extractor for the given options.
    fn new(options: &'a ExtractOptions) -> Self {
        Self {
            options,
            text_keys: options.text_keys.iter().map(String::as_str).collect(),
            skip_keys: options.skip_keys.iter().map(String::as_str).collect(),
            segments: Vec::new(),
        }
    }

    /// Pushes the title segment.
    fn title(&mut self, root: &Map<String, Value>) {
        let field = &self.options.title_field;
        if let Some(title) = root.get(field).and_then(Value::as_str)
            && !title.trim().is_empty()
        {
            self.segments.push(Segment {
                text: title.to_string(),
                source: SourceRef::Title {
                    field: field.clone(),
                },
            });
        }
    }

    /// Extracts one top-level field: rich text, a scalar, or a block structure.
    fn top_field(&mut self, field: &str, value: &Value) {
        let handle = Handle::root().key(field);
        match value {
            Value::String(text) => self.scalar(&Handle::root(), field, text, field),
            Value::Object(_) | Value::Array(_) => self.scan(value, &handle, field, 0),
            _ => debug!(field, "top-level field is not text, skipping"),
        }
    }

    /// Recursively scans a block structure.
    fn scan(&mut self, value: &Value, handle: &Handle, top_field: &str, depth: usize) {
        if depth > self.options.max_block_depth {
            debug!(
                %handle,
                max_depth = self.options.max_block_depth,
                "block depth budget exhausted, truncating"
            );
            return;
        }

        if is_rich_text(value) {
            self.rich_text(value, handle, top_field);
            return;
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if self.skip_keys.contains(key.as_str()) {
                        continue;
                    }
                    match child {
                        Value::String(text) if self.text_keys.contains(key.as_str()) => {
                            self.scalar(handle, key, text, top_field);
                        }
                        Value::Object(_) | Value::Array(_) => {
                            self.scan(child, &handle.key(key), top_field, depth + 1);
                        }
                        _ => {}
                    }
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.scan(item, &handle.index(i), top_field, depth + 1);
                }
            }
            _ => {}
        }
    }

    /// Pushes a rich-text subtree as one segment.
    fn rich_text(&mut self, value: &Value, handle: &Handle, top_field: &str) {
        let rendered = RichTextNode::parse(value, handle, &self.options.rich_text).render();
        self.segments.push(Segment {
            text: rendered.text,
            source: SourceRef::RichText {
                top_field: top_field.to_string(),
                handle: handle.clone(),
            },
        });
    }

    /// Pushes a scalar field if it passes the prose guards.
    fn scalar(&mut self, parent: &Handle, key: &str, text: &str, top_field: &str) {
        if let Some(kind) = classify_token(text) {
            debug!(%parent, key, %kind, "field value is not prose, skipping");
            return;
        }
        self.segments.push(Segment {
            text: text.to_string(),
            source: SourceRef::PlainField {
                parent: parent.clone(),
                key: key.to_string(),
                top_field: top_field.to_string(),
            },
        });
    }
}
