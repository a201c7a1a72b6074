//! Implementation of `redline fix`.

use std::process::ExitCode;

use redline_document::{CorrectionRequest, correct};
use tracing::debug;

use super::shared::{print_json, write_document};
use crate::cli::{args::FixCommand, context::CommandContext};

/// Builds the correction request described by the command line.
fn request(cmd: &FixCommand) -> CorrectionRequest {
    let mut request = match cmd.offset {
        Some(offset) => CorrectionRequest::at(offset, &cmd.original, &cmd.replacement),
        None => CorrectionRequest::unlocated(&cmd.original, &cmd.replacement),
    };
    if cmd.length.is_some() {
        request.length = cmd.length;
    }
    request.field.clone_from(&cmd.field);
    request
}

/// Applies one correction and prints the result as JSON.
pub fn run(ctx: &CommandContext, cmd: &FixCommand) -> ExitCode {
    let mut document = match ctx.read_document(&cmd.document) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let options = ctx.extract_options(&cmd.document);

    let request = request(cmd);
    debug!(?request, "applying correction");
    let result = correct(&mut document, &request, &options);

    if let Err(code) = print_json(&result) {
        return code;
    }

    if !result.applied {
        eprintln!("error: correction was not applied");
        return ExitCode::FAILURE;
    }

    if let Err(code) = write_document(ctx, &document, &cmd.document, &cmd.write) {
        return code;
    }
    ExitCode::SUCCESS
}
