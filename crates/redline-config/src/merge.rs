//! Configuration merging.
//!
//! Layers parsed `RawConfig` files into one `Config`.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    CheckSettings, Config, DocumentSettings, ExtractSettings,
    parse::{RawCheckSettings, RawConfig, RawDocumentSettings, RawExtractSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files given highest precedence first.
///
/// Merge rules:
/// - scalars and `block_fields`: the first file that defines a value wins
/// - extra key, node-type and allow-word lists: concatenated across all files, highest
///   precedence first, without duplicates
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut document = DocumentSettings::default();
    let mut extract = ExtractSettings::default();
    let mut check = CheckSettings::default();

    // Lowest precedence first so later writes win.
    for parsed in configs.iter().rev() {
        debug!(path = %parsed.path.display(), "merging config file");
        if let Some(raw) = &parsed.config.document {
            apply_raw_document(&mut document, raw);
        }
        if let Some(raw) = &parsed.config.extract {
            apply_raw_extract_scalars(&mut extract, raw);
        }
        if let Some(raw) = &parsed.config.check {
            apply_raw_check_scalars(&mut check, raw);
        }
    }

    // Highest precedence first for the accumulated lists.
    for parsed in configs {
        if let Some(raw) = &parsed.config.extract {
            extend_unique(&mut extract.text_keys, raw.text_keys.as_deref());
            extend_unique(&mut extract.skip_keys, raw.skip_keys.as_deref());
            extend_unique(&mut extract.skip_node_types, raw.skip_node_types.as_deref());
        }
        if let Some(raw) = &parsed.config.check {
            extend_unique(&mut check.allow_words, raw.allow_words.as_deref());
        }
    }

    Config {
        document,
        extract,
        check,
        sources: configs.iter().map(|c| c.path.clone()).collect(),
    }
}

/// Applies a raw `[document]` section, overwriting any present values.
fn apply_raw_document(result: &mut DocumentSettings, raw: &RawDocumentSettings) {
    if let Some(v) = &raw.title_field {
        result.title_field.clone_from(v);
    }
    if let Some(v) = &raw.hero_field {
        result.hero_field.clone_from(v);
    }
    if let Some(v) = &raw.content_field {
        result.content_field.clone_from(v);
    }
    if let Some(v) = &raw.block_fields {
        result.block_fields.clone_from(v);
    }
}

/// Applies the scalar values of a raw `[extract]` section.
fn apply_raw_extract_scalars(result: &mut ExtractSettings, raw: &RawExtractSettings) {
    if let Some(v) = raw.max_richtext_depth {
        result.max_richtext_depth = v;
    }
    if let Some(v) = raw.max_block_depth {
        result.max_block_depth = v;
    }
}

/// Applies the scalar values of a raw `[check]` section.
fn apply_raw_check_scalars(result: &mut CheckSettings, raw: &RawCheckSettings) {
    if let Some(v) = &raw.language {
        result.language.clone_from(v);
    }
    if let Some(v) = raw.max_text_length {
        result.max_text_length = v;
    }
    if let Some(v) = raw.delay_ms {
        result.delay_ms = v;
    }
    if let Some(v) = raw.stale_after_secs {
        result.stale_after_secs = v;
    }
    if let Some(v) = raw.allow_list_ttl_secs {
        result.allow_list_ttl_secs = v;
    }
}

/// Appends the items of `extra` not already in `target`.
fn extend_unique(target: &mut Vec<String>, extra: Option<&[String]>) {
    for item in extra.unwrap_or_default() {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
