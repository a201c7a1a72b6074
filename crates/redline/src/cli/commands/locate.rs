//! Implementation of `redline locate`.

use std::process::ExitCode;

use redline_document::{extract, locate};
use redline_highlight::{dim, mark_span, subheader};

use super::inspect::describe_source;
use crate::cli::{args::LocateCommand, context::CommandContext};

/// Maps a flat-text range to its segment and prints the segment with the range marked.
pub fn run(ctx: &CommandContext, cmd: &LocateCommand) -> ExitCode {
    let document = match ctx.read_document(&cmd.document) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let extraction = extract(&document, &ctx.extract_options(&cmd.document));

    let Some(located) = locate(&extraction, cmd.offset, cmd.length) else {
        eprintln!(
            "error: offset {} (length {}) does not fall inside a segment; flat text is {} \
             characters",
            cmd.offset,
            cmd.length,
            extraction.len()
        );
        return ExitCode::FAILURE;
    };

    println!("{}", subheader("Segment:"));
    println!(
        "   #{} {}",
        located.index,
        dim(&describe_source(&located.segment.source))
    );
    println!("   top-level field: {}", located.segment.source.top_field());
    println!("   local offset:    {}", located.local_offset);
    println!();
    println!("{}", subheader("Text:"));
    let marked = mark_span(&located.segment.text, located.local_offset, cmd.length);
    for line in marked.lines() {
        println!("   {line}");
    }
    ExitCode::SUCCESS
}
