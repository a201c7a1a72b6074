//! Configuration file parsing.
//!
//! Each `.redline.toml` parses into a `RawConfig` whose fields are all optional, so partial
//! files can be layered by the merger.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Document shape section.
    pub document: Option<RawDocumentSettings>,
    /// Extraction section.
    pub extract: Option<RawExtractSettings>,
    /// Checking section.
    pub check: Option<RawCheckSettings>,
}

/// Raw `[document]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDocumentSettings {
    /// Top-level title field.
    pub title_field: Option<String>,
    /// Top-level hero field; an empty string disables it.
    pub hero_field: Option<String>,
    /// Top-level primary rich-text field.
    pub content_field: Option<String>,
    /// Top-level block list fields.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub block_fields: Option<Vec<String>>,
}

/// Raw `[extract]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExtractSettings {
    /// Extra keys whose string values are prose.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub text_keys: Option<Vec<String>>,
    /// Extra structural keys to skip.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub skip_keys: Option<Vec<String>>,
    /// Extra rich-text node types to skip.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub skip_node_types: Option<Vec<String>>,
    /// Rich-text recursion budget.
    pub max_richtext_depth: Option<usize>,
    /// Block graph recursion budget.
    pub max_block_depth: Option<usize>,
}

/// Raw `[check]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCheckSettings {
    /// Language code passed to the checker.
    pub language: Option<String>,
    /// Longest flat-text prefix submitted, in characters.
    pub max_text_length: Option<usize>,
    /// Pause between checker calls in a batch, in milliseconds.
    pub delay_ms: Option<u64>,
    /// Seconds without progress before a batch is considered stale.
    pub stale_after_secs: Option<u64>,
    /// Words never reported as errors.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub allow_words: Option<Vec<String>>,
    /// Seconds an allow-list fetch stays fresh.
    pub allow_list_ttl_secs: Option<u64>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// `path` is used only for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns true if the config file at `path` sets `root = true`.
///
/// Unreadable or malformed files count as non-root; loading reports them properly later.
pub fn is_root_config(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| toml::from_str::<RawConfig>(&contents).ok())
        .is_some_and(|config| config.root == Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RawConfig {
        parse_config_str(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("");
        assert!(config.root.is_none());
        assert!(config.document.is_none());
        assert!(config.extract.is_none());
        assert!(config.check.is_none());
    }

    #[test]
    fn test_parse_document_section() {
        let config = parse(
            r#"
[document]
content_field = "body"
hero_field = ""
block_fields = ["layout", "sidebar"]
"#,
        );
        let document = config.document.unwrap();
        assert_eq!(document.content_field.as_deref(), Some("body"));
        assert_eq!(document.hero_field.as_deref(), Some(""));
        assert!(document.title_field.is_none());
        assert_eq!(
            document.block_fields,
            Some(vec!["layout".to_string(), "sidebar".to_string()])
        );
    }

    #[test]
    fn test_lists_accept_a_single_string() {
        let config = parse(
            r#"
[document]
block_fields = "sections"

[check]
allow_words = "Redline"
"#,
        );
        assert_eq!(
            config.document.unwrap().block_fields,
            Some(vec!["sections".to_string()])
        );
        assert_eq!(
            config.check.unwrap().allow_words,
            Some(vec!["Redline".to_string()])
        );
    }

    #[test]
    fn test_parse_extract_section() {
        let config = parse(
            r#"
[extract]
text_keys = ["tagline", "blurb"]
skip_node_types = "embed"
max_richtext_depth = 20
"#,
        );
        let extract = config.extract.unwrap();
        assert_eq!(
            extract.text_keys,
            Some(vec!["tagline".to_string(), "blurb".to_string()])
        );
        assert_eq!(extract.skip_node_types, Some(vec!["embed".to_string()]));
        assert!(extract.skip_keys.is_none());
        assert_eq!(extract.max_richtext_depth, Some(20));
        assert!(extract.max_block_depth.is_none());
    }

    #[test]
    fn test_parse_check_section() {
        let config = parse(
            r#"
[check]
language = "fr"
max_text_length = 15000
delay_ms = 500
stale_after_secs = 120
allow_list_ttl_secs = 60
"#,
        );
        let check = config.check.unwrap();
        assert_eq!(check.language.as_deref(), Some("fr"));
        assert_eq!(check.max_text_length, Some(15_000));
        assert_eq!(check.delay_ms, Some(500));
        assert_eq!(check.stale_after_secs, Some(120));
        assert_eq!(check.allow_list_ttl_secs, Some(60));
        assert!(check.allow_words.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config = parse(
            r#"
[check]
language = "de"
engine = "ignored"

[unknown]
foo = 1
"#,
        );
        assert_eq!(config.check.unwrap().language.as_deref(), Some("de"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config_str("[[[nope", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_wrong_type() {
        let result = parse_config_str("[check]\ndelay_ms = \"soon\"\n", Path::new("t.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/.redline.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".redline.toml");

        fs::write(&path, "root = true\n").unwrap();
        assert!(is_root_config(&path));

        fs::write(&path, "root = false\n").unwrap();
        assert!(!is_root_config(&path));

        fs::write(&path, "[check]\nlanguage = \"fr\"\n").unwrap();
        assert!(!is_root_config(&path));

        fs::write(&path, "root = [").unwrap();
        assert!(!is_root_config(&path));

        assert!(!is_root_config(&dir.path().join("missing.toml")));
    }
}
