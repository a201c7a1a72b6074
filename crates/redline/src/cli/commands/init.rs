//! Implementation of `redline init`.

use std::{fs, path::PathBuf, process::ExitCode};

use redline_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};
use redline_highlight::{Highlighter, indent_content, subheader};

use crate::cli::{args::InitCommand, context::CommandContext};

/// Picks the file to create. Running in the home directory always targets the global file.
fn target(ctx: &CommandContext, global: bool) -> Result<(PathBuf, bool), ExitCode> {
    let global_path = global_config_path();
    let in_home = global_path
        .as_deref()
        .and_then(|p| p.parent())
        .is_some_and(|home| home == ctx.cwd);

    if !(global || in_home) {
        return Ok((ctx.cwd.join(CONFIG_FILENAME), false));
    }
    match global_path {
        Some(path) => Ok((path, true)),
        None => {
            eprintln!("error: could not determine home directory");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Writes a commented `.redline.toml` template.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let (config_path, is_global) = match target(ctx, cmd.global) {
        Ok(target) => target,
        Err(code) => return code,
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if is_global {
        global_template()
    } else {
        local_template()
    };
    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    let highlighted = Highlighter::new().highlight_toml(&template);
    println!("{}", indent_content(&highlighted));

    ExitCode::SUCCESS
}
