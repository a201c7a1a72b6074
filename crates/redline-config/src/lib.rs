//! Configuration system for redline.
//!
//! redline reads TOML files named `.redline.toml`. They are discovered by walking from the
//! working directory towards the filesystem root, then `~/.redline.toml` is added as the
//! lowest-precedence global config. Files closer to the working directory win.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawCheckSettings, RawConfig, RawDocumentSettings, RawExtractSettings, parse_config_file,
    parse_config_str,
};
use redline_document::{
    DEFAULT_MAX_BLOCK_DEPTH, DEFAULT_MAX_DEPTH, DEFAULT_SKIP_KEYS, DEFAULT_SKIP_TYPES,
    DEFAULT_TEXT_KEYS, ExtractOptions, RichTextOptions,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Merged configuration for redline.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where text lives in a document.
    pub document: DocumentSettings,
    /// What extraction keeps and how deep it goes.
    pub extract: ExtractSettings,
    /// Checker and batch settings.
    pub check: CheckSettings,
    /// Files that contributed to this configuration, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Discovers and merges every `.redline.toml` that applies to `cwd`.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Loads and merges the given files, highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Builds the extraction options these settings describe.
    ///
    /// Configured key and node-type lists extend the built-in defaults.
    pub fn extract_options(&self) -> ExtractOptions {
        let document = &self.document;
        let extract = &self.extract;
        ExtractOptions {
            title_field: document.title_field.clone(),
            hero_field: (!document.hero_field.is_empty()).then(|| document.hero_field.clone()),
            content_field: document.content_field.clone(),
            block_fields: document.block_fields.clone(),
            text_keys: with_defaults(DEFAULT_TEXT_KEYS, &extract.text_keys),
            skip_keys: with_defaults(DEFAULT_SKIP_KEYS, &extract.skip_keys),
            rich_text: RichTextOptions {
                max_depth: extract.max_richtext_depth,
                skip_types: with_defaults(DEFAULT_SKIP_TYPES, &extract.skip_node_types),
            },
            max_block_depth: extract.max_block_depth,
        }
    }

    /// Serializes the effective settings in `.redline.toml` form.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            document: &self.document,
            extract: &self.extract,
            check: &self.check,
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Appends `extra` entries missing from `defaults`.
fn with_defaults(defaults: &[&str], extra: &[String]) -> Vec<String> {
    let mut result: Vec<String> = defaults.iter().map(|s| (*s).to_string()).collect();
    for item in extra {
        if !result.contains(item) {
            result.push(item.clone());
        }
    }
    result
}

/// The `[document]` section: where text lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Top-level title field.
    pub title_field: String,
    /// Top-level hero field; empty disables it.
    pub hero_field: String,
    /// Top-level primary rich-text field.
    pub content_field: String,
    /// Top-level block list fields, scanned in order.
    pub block_fields: Vec<String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            title_field: String::from("title"),
            hero_field: String::from("hero"),
            content_field: String::from("content"),
            block_fields: vec![String::from("layout")],
        }
    }
}

/// The `[extract]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Keys treated as prose in addition to the built-in list.
    pub text_keys: Vec<String>,
    /// Keys skipped in addition to the built-in list.
    pub skip_keys: Vec<String>,
    /// Rich-text node types skipped in addition to the built-in list.
    pub skip_node_types: Vec<String>,
    /// Rich-text recursion budget.
    pub max_richtext_depth: usize,
    /// Block graph recursion budget.
    pub max_block_depth: usize,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            text_keys: Vec::new(),
            skip_keys: Vec::new(),
            skip_node_types: Vec::new(),
            max_richtext_depth: DEFAULT_MAX_DEPTH,
            max_block_depth: DEFAULT_MAX_BLOCK_DEPTH,
        }
    }
}

/// The `[check]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Language code passed to the checker.
    pub language: String,
    /// Longest flat-text prefix submitted, in characters.
    pub max_text_length: usize,
    /// Pause between checker calls in a batch, in milliseconds.
    pub delay_ms: u64,
    /// Seconds without progress before a batch is considered stale.
    pub stale_after_secs: u64,
    /// Words never reported as errors.
    pub allow_words: Vec<String>,
    /// Seconds an allow-list fetch stays fresh.
    pub allow_list_ttl_secs: u64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            max_text_length: 20_000,
            delay_ms: 3_000,
            stale_after_secs: 600,
            allow_words: Vec::new(),
            allow_list_ttl_secs: 300,
        }
    }
}

/// Borrowed view of the settings sections for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Document section.
    document: &'a DocumentSettings,
    /// Extract section.
    extract: &'a ExtractSettings,
    /// Check section.
    check: &'a CheckSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.document.content_field, "content");
        assert_eq!(config.document.block_fields, vec!["layout"]);
        assert_eq!(config.extract.max_richtext_depth, 50);
        assert_eq!(config.extract.max_block_depth, 10);
        assert_eq!(config.check.language, "en-US");
        assert_eq!(config.check.max_text_length, 20_000);
        assert_eq!(config.check.delay_ms, 3_000);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_default_extract_options_match_library_defaults() {
        assert_eq!(Config::default().extract_options(), ExtractOptions::default());
    }

    #[test]
    fn test_extract_options_extend_defaults() {
        let mut config = Config::default();
        config.document.hero_field = String::new();
        config.extract.text_keys = vec!["tagline".into(), "title".into()];
        config.extract.skip_node_types = vec!["embed".into()];

        let options = config.extract_options();
        assert!(options.hero_field.is_none());
        assert_eq!(options.text_keys.last().map(String::as_str), Some("tagline"));
        assert_eq!(
            options.text_keys.iter().filter(|k| *k == "title").count(),
            1
        );
        assert!(options.rich_text.skip_types.contains(&"embed".to_string()));
        assert!(options.rich_text.skip_types.contains(&"code".to_string()));
    }

    #[test]
    fn test_settings_to_toml() {
        let toml_text = Config::default().settings_to_toml();
        assert!(toml_text.contains("[document]"));
        assert!(toml_text.contains("[extract]"));
        assert!(toml_text.contains("[check]"));
        assert!(toml_text.contains("content_field = \"content\""));
        assert!(toml_text.contains("delay_ms = 3000"));

        let raw = parse_config_str(&toml_text, Path::new("effective.toml")).unwrap();
        assert_eq!(raw.check.unwrap().language.as_deref(), Some("en-US"));
    }
}
