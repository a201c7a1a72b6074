//! Implementation of `redline validate`.

use std::process::ExitCode;

use redline_config::{ConfigWarning, is_global_config};
use redline_highlight::{dim, subheader, warning};

use crate::cli::context::CommandContext;

/// Lists the configuration files in effect and reports validation warnings.
///
/// Exits with failure when there are warnings, so scripts can gate on a clean config.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    println!("{}", subheader("Config files:"));
    if config.sources.is_empty() {
        println!("   {}", dim("(none, using defaults)"));
    }
    for path in &config.sources {
        let display = path.strip_prefix(&ctx.cwd).unwrap_or(path).display();
        if is_global_config(path) {
            println!("   {display} {}", dim("(global)"));
        } else {
            println!("   {display}");
        }
    }
    println!();

    println!("{}", subheader("Document fields:"));
    let document = &config.document;
    println!("   title:   {}", document.title_field);
    if document.hero_field.is_empty() {
        println!("   hero:    {}", dim("(disabled)"));
    } else {
        println!("   hero:    {}", document.hero_field);
    }
    println!("   content: {}", document.content_field);
    println!("   blocks:  {}", document.block_fields.join(", "));
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    for w in warnings {
        let hint = match w {
            ConfigWarning::ContentFieldInBlockFields { .. } => {
                "Hint: remove the content field from [document] block_fields"
            }
            ConfigWarning::FieldNameCollision { .. } => {
                "Hint: give title_field, hero_field and content_field distinct names"
            }
            ConfigWarning::ZeroDepthLimit { .. } => {
                "Hint: a depth limit of 0 extracts nothing below the top level"
            }
            ConfigWarning::EmptyLanguage => "Hint: set [check] language, e.g. \"en-US\"",
        };
        println!("{}", dim(hint));
    }
}
