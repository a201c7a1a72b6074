//! Rich-text AST recognition and rendering.
//!
//! Editor state arrives as loosely shaped JSON. It is classified exactly once, by
//! [`RichTextNode::parse`], into a tagged tree; everything downstream (rendering for the
//! checker, locating the node a correction lands on) walks that tree and never looks at the
//! raw shapes again.
//!
//! Rendering rules:
//! - `Text` contributes its literal content
//! - `Paragraph`, `Heading` and `ListItem` contribute their children followed by one `\n`
//! - `Container` contributes its children with no separator
//! - `Skip` contributes nothing and its subtree is never visited

use serde_json::Value;
use tracing::debug;

use crate::{handle::Handle, text::char_len};

/// Default recursion budget for rich-text subtrees.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Node types whose content is never natural language.
pub const DEFAULT_SKIP_TYPES: &[&str] = &[
    "code",
    "code-highlight",
    "codeBlock",
    "linebreak",
    "horizontalrule",
    "upload",
    "relationship",
    "block",
    "inlineBlock",
];

/// Options controlling rich-text recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextOptions {
    /// Maximum nesting depth; deeper subtrees are dropped.
    pub max_depth: usize,
    /// Node `type` tags classified as [`RichTextNode::Skip`].
    pub skip_types: Vec<String>,
}

impl Default for RichTextOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            skip_types: DEFAULT_SKIP_TYPES.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

impl RichTextOptions {
    /// Returns true if nodes tagged `kind` are excluded from rendering.
    fn is_skipped(&self, kind: &str) -> bool {
        self.skip_types.iter().any(|t| t == kind)
    }
}

/// A classified rich-text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichTextNode {
    /// A text leaf, with the handle of the JSON object that owns the `text` member.
    Text {
        /// Literal text content.
        text: String,
        /// Location of the leaf object in the document.
        handle: Handle,
    },
    /// A paragraph (or quote) block.
    Paragraph(Vec<Self>),
    /// A heading block.
    Heading(Vec<Self>),
    /// A list item block.
    ListItem(Vec<Self>),
    /// A wrapper that passes its children's text through: roots, lists, links, marks.
    Container(Vec<Self>),
    /// Content that is not natural language, or a shape that was not recognised.
    Skip,
}

/// Returns true if `value` has the shape of a rich-text subtree.
///
/// Recognised shapes are an editor state (`{"root": {...}}`) and a typed element
/// (`{"type": "...", "children": [...]}`).
pub fn is_rich_text(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    if map.get("root").is_some_and(Value::is_object) {
        return true;
    }
    map.get("type").is_some_and(Value::is_string)
        && map.get("children").is_some_and(Value::is_array)
}

impl RichTextNode {
    /// Classifies `value`, located at `handle`, into a node tree.
    ///
    /// Never fails: unknown shapes become `Skip`, and anything nested deeper than
    /// `options.max_depth` is truncated to `Skip`.
    pub fn parse(value: &Value, handle: &Handle, options: &RichTextOptions) -> Self {
        parse_node(value, handle, options, 0)
    }

    /// Renders the tree to plain text, recording where each text leaf landed.
    pub fn render(&self) -> Rendered {
        let mut rendered = Rendered::default();
        let mut position = 0;
        self.render_into(&mut rendered, &mut position);
        rendered
    }

    /// Appends this node's text to `out`, advancing `position` in characters.
    fn render_into(&self, out: &mut Rendered, position: &mut usize) {
        match self {
            Self::Text { text, handle } => {
                let len = char_len(text);
                out.spans.push(TextSpan {
                    start: *position,
                    len,
                    handle: handle.clone(),
                });
                out.text.push_str(text);
                *position += len;
            }
            Self::Paragraph(children) | Self::Heading(children) | Self::ListItem(children) => {
                for child in children {
                    child.render_into(out, position);
                }
                out.text.push('\n');
                *position += 1;
            }
            Self::Container(children) => {
                for child in children {
                    child.render_into(out, position);
                }
            }
            Self::Skip => {}
        }
    }
}

/// Classifies one value at the given depth.
fn parse_node(
    value: &Value,
    handle: &Handle,
    options: &RichTextOptions,
    depth: usize,
) -> RichTextNode {
    if depth > options.max_depth {
        debug!(
            %handle,
            max_depth = options.max_depth,
            "rich-text depth budget exhausted, truncating"
        );
        return RichTextNode::Skip;
    }

    match value {
        Value::Array(items) => {
            RichTextNode::Container(parse_children(items, handle, options, depth))
        }
        Value::Object(map) => {
            if let Some(root) = map.get("root") {
                return RichTextNode::Container(vec![parse_node(
                    root,
                    &handle.key("root"),
                    options,
                    depth + 1,
                )]);
            }

            let kind = map.get("type").and_then(Value::as_str);
            if let Some(kind) = kind
                && options.is_skipped(kind)
            {
                return RichTextNode::Skip;
            }

            let children = map.get("children").and_then(Value::as_array);
            if children.is_none()
                && matches!(kind, None | Some("text"))
                && let Some(text) = map.get("text").and_then(Value::as_str)
            {
                return RichTextNode::Text {
                    text: text.to_string(),
                    handle: handle.clone(),
                };
            }

            let (Some(kind), Some(children)) = (kind, children) else {
                debug!(%handle, "unrecognised rich-text node, skipping");
                return RichTextNode::Skip;
            };
            let children = parse_children(children, &handle.key("children"), options, depth);
            match kind {
                "paragraph" | "quote" => RichTextNode::Paragraph(children),
                "heading" => RichTextNode::Heading(children),
                "listitem" => RichTextNode::ListItem(children),
                _ => RichTextNode::Container(children),
            }
        }
        _ => RichTextNode::Skip,
    }
}

/// Classifies the elements of a children array located at `handle`.
fn parse_children(
    items: &[Value],
    handle: &Handle,
    options: &RichTextOptions,
    depth: usize,
) -> Vec<RichTextNode> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_node(item, &handle.index(i), options, depth + 1))
        .collect()
}

/// Plain text rendered from a rich-text tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The rendered text.
    pub text: String,
    /// One span per text leaf, in rendering order.
    pub spans: Vec<TextSpan>,
}

/// The character range a text leaf occupies in rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Character offset of the leaf's first character.
    pub start: usize,
    /// Length of the leaf's text in characters.
    pub len: usize,
    /// Location of the leaf object in the document.
    pub handle: Handle,
}

impl TextSpan {
    /// Returns true if `[offset, offset + len)` lies entirely inside this leaf.
    ///
    /// An empty range may sit at either edge; a non-empty range must cover at least one of
    /// the leaf's own characters.
    pub fn contains(&self, offset: usize, len: usize) -> bool {
        let end = self.start + self.len;
        offset >= self.start
            && offset.checked_add(len).is_some_and(|stop| stop <= end)
            && (len == 0 || offset < end)
    }
}

impl Rendered {
    /// Returns the first leaf wholly containing the given character range.
    pub fn span_containing(&self, offset: usize, len: usize) -> Option<&TextSpan> {
        self.spans.iter().find(|span| span.contains(offset, len))
    }
}

/// Renders a rich-text value to plain text.
pub fn walk(value: &Value, options: &RichTextOptions) -> String {
    RichTextNode::parse(value, &Handle::root(), options).render().text
}
