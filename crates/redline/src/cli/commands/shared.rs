//! Shared helpers for command implementations.

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use redline_document::save_document;
use redline_highlight::Highlighter;
use serde::Serialize;
use serde_json::Value;

use crate::cli::{
    args::{DocumentArgs, WriteArgs},
    context::CommandContext,
};

/// Returns the path a modified document goes to, or `None` to leave files untouched.
fn destination(
    ctx: &CommandContext,
    document: &DocumentArgs,
    write: &WriteArgs,
) -> Option<PathBuf> {
    if write.in_place {
        Some(ctx.resolve(&document.file))
    } else {
        write.output.as_deref().map(|path| ctx.resolve(path))
    }
}

/// Writes a modified document to `--output` or back over the input with `--in-place`.
///
/// Without either flag nothing is written.
pub fn write_document(
    ctx: &CommandContext,
    value: &Value,
    document: &DocumentArgs,
    write: &WriteArgs,
) -> Result<(), ExitCode> {
    let Some(path) = destination(ctx, document, write) else {
        return Ok(());
    };
    save_document(value, &path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

/// Renders a value as pretty JSON with a trailing newline, highlighted when `color` is set.
fn render_json<T: Serialize>(value: &T, color: bool) -> Result<String, ExitCode> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("error: failed to serialize output: {e}");
        ExitCode::FAILURE
    })?;
    let json = format!("{json}\n");
    if color {
        Ok(Highlighter::new().highlight_json(&json))
    } else {
        Ok(json)
    }
}

/// Prints a value as pretty JSON, highlighted when stdout is a terminal.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    let rendered = render_json(value, io::stdout().is_terminal())?;
    print!("{rendered}");
    Ok(())
}
