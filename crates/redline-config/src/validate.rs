//! Configuration validation.
//!
//! Reports settings that load fine but cannot do what the user probably meant.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The content field is also listed as a block field, so it is extracted once.
    ContentFieldInBlockFields {
        /// The duplicated field.
        field: String,
    },
    /// Two of the title, hero and content settings name the same field.
    FieldNameCollision {
        /// The shared field name.
        field: String,
        /// First setting using it.
        first: &'static str,
        /// Second setting using it.
        second: &'static str,
    },
    /// A depth limit of zero disables most extraction.
    ZeroDepthLimit {
        /// Name of the setting.
        setting: &'static str,
    },
    /// No checker language is configured.
    EmptyLanguage,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentFieldInBlockFields { field } => {
                write!(f, "content field '{field}' is also listed in block_fields")
            }
            Self::FieldNameCollision {
                field,
                first,
                second,
            } => write!(f, "{first} and {second} both name field '{field}'"),
            Self::ZeroDepthLimit { setting } => {
                write!(f, "{setting} is 0, nested text will not be extracted")
            }
            Self::EmptyLanguage => write!(f, "check language is empty"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let document = &config.document;

    if document.block_fields.contains(&document.content_field) {
        warnings.push(ConfigWarning::ContentFieldInBlockFields {
            field: document.content_field.clone(),
        });
    }

    let named = [
        ("title_field", &document.title_field),
        ("hero_field", &document.hero_field),
        ("content_field", &document.content_field),
    ];
    for (i, &(first, a)) in named.iter().enumerate() {
        for &(second, b) in &named[i + 1..] {
            if !a.is_empty() && a == b {
                warnings.push(ConfigWarning::FieldNameCollision {
                    field: a.clone(),
                    first,
                    second,
                });
            }
        }
    }

    if config.extract.max_richtext_depth == 0 {
        warnings.push(ConfigWarning::ZeroDepthLimit {
            setting: "max_richtext_depth",
        });
    }
    if config.extract.max_block_depth == 0 {
        warnings.push(ConfigWarning::ZeroDepthLimit {
            setting: "max_block_depth",
        });
    }

    if config.check.language.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyLanguage);
    }

    warnings
}
