//! Structural guards for scalar block fields.
//!
//! A block field is only submitted to the checker when its key is known to carry prose and
//! its value does not look like a machine token. The guards are deliberately shallow: a
//! handful of shape checks, not a classifier.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

/// Keys whose string values carry natural language.
pub const DEFAULT_TEXT_KEYS: &[&str] = &[
    "title",
    "subtitle",
    "heading",
    "subheading",
    "description",
    "caption",
    "label",
    "quote",
    "summary",
    "excerpt",
    "text",
    "alt",
    "body",
    "intro",
    "content",
];

/// Keys that never carry content: identifiers, discriminators, ordering, references,
/// timestamps and presentation settings.
pub const DEFAULT_SKIP_KEYS: &[&str] = &[
    "id",
    "_id",
    "blockType",
    "blockName",
    "type",
    "slug",
    "url",
    "href",
    "media",
    "image",
    "icon",
    "relationTo",
    "value",
    "doc",
    "parent",
    "tenant",
    "createdAt",
    "updatedAt",
    "publishedAt",
    "_order",
    "order",
    "position",
    "sort",
    "_status",
    "color",
    "variant",
    "style",
    "className",
    "anchor",
    "target",
];

/// URLs, protocol-relative links and bare `www.` hosts.
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:[a-z][a-z0-9+.-]*://|//|mailto:|tel:|www\.)\S*$").expect("valid regex")
});

/// Site-relative paths such as `/about/team`.
static PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/\S*$").expect("valid regex"));

/// RFC 4122 UUIDs.
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});

/// 24-character hexadecimal object ids.
static OBJECT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[0-9a-f]{24}$").expect("valid regex"));

/// ISO 8601 dates with optional time and zone.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\d{4}-\d{2}-\d{2}",
        r"(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$"
    ))
    .expect("valid regex")
});

/// Hex colours.
static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
});

/// E-mail addresses.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Why a scalar value was rejected as non-prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Empty or whitespace only.
    Blank,
    /// A URL or site path.
    Url,
    /// A UUID or object id.
    Identifier,
    /// An ISO date or timestamp.
    Date,
    /// A hex colour.
    Color,
    /// An e-mail address.
    Email,
    /// A serialized JSON object or array.
    Json,
    /// A number.
    Number,
    /// Contains no letters at all.
    NoLetters,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Blank => "blank",
            Self::Url => "url",
            Self::Identifier => "identifier",
            Self::Date => "date",
            Self::Color => "color",
            Self::Email => "email",
            Self::Json => "json",
            Self::Number => "number",
            Self::NoLetters => "no letters",
        };
        f.write_str(name)
    }
}

/// Classifies a value as a machine token, or returns `None` if it may be prose.
pub fn classify_token(value: &str) -> Option<TokenKind> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(TokenKind::Blank);
    }
    if URL.is_match(trimmed) || PATH.is_match(trimmed) {
        return Some(TokenKind::Url);
    }
    if UUID.is_match(trimmed) || OBJECT_ID.is_match(trimmed) {
        return Some(TokenKind::Identifier);
    }
    if DATE.is_match(trimmed) {
        return Some(TokenKind::Date);
    }
    if COLOR.is_match(trimmed) {
        return Some(TokenKind::Color);
    }
    if EMAIL.is_match(trimmed) {
        return Some(TokenKind::Email);
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<Value>(trimmed).is_ok()
    {
        return Some(TokenKind::Json);
    }
    if trimmed.contains(|c: char| c.is_ascii_digit()) && trimmed.parse::<f64>().is_ok() {
        return Some(TokenKind::Number);
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return Some(TokenKind::NoLetters);
    }
    None
}

/// Returns true if `value` may be natural language.
pub fn looks_like_prose(value: &str) -> bool {
    classify_token(value).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_passes() {
        assert!(looks_like_prose("Nos engagements"));
        assert!(looks_like_prose("Découvrez notre équipe."));
        assert!(looks_like_prose("A"));
        assert!(looks_like_prose("Version 2 est disponible"));
        assert!(looks_like_prose("Infinity"));
    }

    #[test]
    fn test_urls_rejected() {
        assert_eq!(classify_token("https://example.com/a?b=c"), Some(TokenKind::Url));
        assert_eq!(classify_token("www.example.com"), Some(TokenKind::Url));
        assert_eq!(classify_token("mailto:hi@example.com"), Some(TokenKind::Url));
        assert_eq!(classify_token("/about/team"), Some(TokenKind::Url));
    }

    #[test]
    fn test_identifiers_rejected() {
        assert_eq!(
            classify_token("550e8400-e29b-41d4-a716-446655440000"),
            Some(TokenKind::Identifier)
        );
        assert_eq!(
            classify_token("65a1f0c2e4b0a1b2c3d4e5f6"),
            Some(TokenKind::Identifier)
        );
    }

    #[test]
    fn test_dates_rejected() {
        assert_eq!(classify_token("2024-03-01"), Some(TokenKind::Date));
        assert_eq!(classify_token("2024-03-01T10:20:30.123Z"), Some(TokenKind::Date));
        assert_eq!(classify_token("2024-03-01 10:20+02:00"), Some(TokenKind::Date));
    }

    #[test]
    fn test_misc_tokens_rejected() {
        assert_eq!(classify_token("#ff00aa"), Some(TokenKind::Color));
        assert_eq!(classify_token("team@example.org"), Some(TokenKind::Email));
        assert_eq!(classify_token(r#"{"a": 1}"#), Some(TokenKind::Json));
        assert_eq!(classify_token("[1, 2]"), Some(TokenKind::Json));
        assert_eq!(classify_token("3.14"), Some(TokenKind::Number));
        assert_eq!(classify_token("-- / --"), Some(TokenKind::NoLetters));
        assert_eq!(classify_token("   "), Some(TokenKind::Blank));
    }

    #[test]
    fn test_bracketed_prose_is_not_json() {
        assert!(looks_like_prose("[Brouillon] Notre histoire"));
    }
}
