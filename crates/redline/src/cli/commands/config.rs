//! Implementation of `redline config`.

use std::process::ExitCode;

use redline_highlight::{Highlighter, dim};

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    if config.sources.is_empty() {
        println!("{}", dim("# no configuration files found, showing defaults"));
    }
    let highlighter = Highlighter::new();
    print!("{}", highlighter.highlight_toml(&config.settings_to_toml()));
    ExitCode::SUCCESS
}
