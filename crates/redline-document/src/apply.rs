//! Applying a located correction to the document.

use serde_json::Value;
use tracing::debug;

use crate::{
    handle::Handle,
    richtext::{RichTextNode, RichTextOptions},
    segment::{Segment, SourceRef},
    text::splice,
};

/// Outcome of applying a correction to one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The document was changed.
    Applied {
        /// Top-level field to persist.
        modified_field: String,
    },
    /// The range did not land inside one live text node; the document is unchanged.
    Failed,
}

impl ApplyOutcome {
    /// Returns true if the document was changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Replaces `length` characters at `local_offset` inside `segment`'s source.
///
/// Rich-text segments are re-parsed with the same options used at extraction, so the
/// character counting that picks the text node is the counting that produced the segment.
pub fn apply(
    document: &mut Value,
    segment: &Segment,
    local_offset: usize,
    length: usize,
    replacement: &str,
    options: &RichTextOptions,
) -> ApplyOutcome {
    let applied = match &segment.source {
        SourceRef::Title { field } => {
            splice_member(document, &Handle::root(), field, local_offset, length, replacement)
        }
        SourceRef::PlainField { parent, key, .. } => {
            splice_member(document, parent, key, local_offset, length, replacement)
        }
        SourceRef::RichText { handle, .. } => {
            splice_rich_text(document, handle, local_offset, length, replacement, options)
        }
    };

    if applied {
        ApplyOutcome::Applied {
            modified_field: segment.source.top_field().to_string(),
        }
    } else {
        debug!(
            source = ?segment.source,
            local_offset,
            length,
            "correction does not fit a live text node"
        );
        ApplyOutcome::Failed
    }
}

/// Splices the string member `key` of the object at `parent`.
fn splice_member(
    document: &mut Value,
    parent: &Handle,
    key: &str,
    offset: usize,
    length: usize,
    replacement: &str,
) -> bool {
    let Some(slot) = parent
        .resolve_mut(document)
        .and_then(Value::as_object_mut)
        .and_then(|map| map.get_mut(key))
    else {
        return false;
    };
    let Some(updated) = slot
        .as_str()
        .and_then(|current| splice(current, offset, length, replacement))
    else {
        return false;
    };
    *slot = Value::String(updated);
    true
}

/// Splices the text leaf of the rich-text subtree at `handle` that covers the range.
fn splice_rich_text(
    document: &mut Value,
    handle: &Handle,
    offset: usize,
    length: usize,
    replacement: &str,
    options: &RichTextOptions,
) -> bool {
    let Some(subtree) = handle.resolve(document) else {
        return false;
    };
    let rendered = RichTextNode::parse(subtree, handle, options).render();
    let Some(span) = rendered.span_containing(offset, length) else {
        return false;
    };
    let leaf = span.handle.clone();
    let local = offset - span.start;
    splice_member(document, &leaf, "text", local, length, replacement)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extract::{ExtractOptions, extract};

    fn document() -> Value {
        json!({
            "title": "Titre",
            "content": {"root": {"type": "root", "children": [
                {"type": "paragraph", "children": [
                    {"type": "text", "text": "Ceci est "},
                    {"type": "text", "format": 1, "text": "une"},
                    {"type": "text", "text": " test."},
                ]},
                {"type": "code", "children": [{"type": "text", "text": "une"}]},
            ]}},
            "layout": [{"blockType": "cta", "heading": "Apellez-nous"}],
        })
    }

    #[test]
    fn test_apply_title() {
        let mut doc = document();
        let extraction = extract(&doc, &ExtractOptions::default());
        let outcome = apply(
            &mut doc,
            &extraction.segments()[0],
            4,
            1,
            "es",
            &RichTextOptions::default(),
        );
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                modified_field: "title".into()
            }
        );
        assert_eq!(doc["title"], "Titres");
    }

    #[test]
    fn test_apply_rich_text_targets_the_right_leaf() {
        let mut doc = document();
        let extraction = extract(&doc, &ExtractOptions::default());
        let outcome = apply(
            &mut doc,
            &extraction.segments()[1],
            9,
            3,
            "un",
            &RichTextOptions::default(),
        );
        assert!(outcome.is_applied());
        let children = &doc["content"]["root"]["children"];
        assert_eq!(children[0]["children"][1]["text"], "un");
        assert_eq!(children[0]["children"][1]["format"], 1);
        assert_eq!(children[1]["children"][0]["text"], "une");
    }

    #[test]
    fn test_apply_plain_field() {
        let mut doc = document();
        let extraction = extract(&doc, &ExtractOptions::default());
        let segment = &extraction.segments()[2];
        let outcome = apply(&mut doc, segment, 0, 7, "Appelez", &RichTextOptions::default());
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                modified_field: "layout".into()
            }
        );
        assert_eq!(doc["layout"][0]["heading"], "Appelez-nous");
    }

    #[test]
    fn test_range_across_leaves_fails_without_mutation() {
        let mut doc = document();
        let before = doc.clone();
        let extraction = extract(&doc, &ExtractOptions::default());
        let outcome = apply(
            &mut doc,
            &extraction.segments()[1],
            5,
            7,
            "est un",
            &RichTextOptions::default(),
        );
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_stale_handle_fails() {
        let mut doc = document();
        let extraction = extract(&doc, &ExtractOptions::default());
        doc["layout"] = json!([]);
        let before = doc.clone();
        let segment = &extraction.segments()[2];
        let outcome = apply(&mut doc, segment, 0, 1, "x", &RichTextOptions::default());
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert_eq!(doc, before);
    }
}
