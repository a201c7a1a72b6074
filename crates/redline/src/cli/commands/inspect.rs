//! Implementation of `redline inspect`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use redline_document::{SourceRef, extract, text::char_len};
use redline_highlight::{dim, header, preview, subheader};

use crate::cli::{args::InspectCommand, context::CommandContext};

/// Shows each segment of a document with its position and source.
pub fn run(ctx: &CommandContext, cmd: &InspectCommand) -> ExitCode {
    let document = match ctx.read_document(&cmd.document) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let extraction = extract(&document, &ctx.extract_options(&cmd.document));

    println!("{}", header(&cmd.document.file.display().to_string()));
    println!(
        "   {}",
        dim(&format!(
            "{} characters, trim delta {}, fingerprint {}",
            extraction.len(),
            extraction.trim_delta(),
            extraction.fingerprint()
        ))
    );
    println!();

    println!(
        "{}",
        subheader(&format!("Segments ({}):", extraction.segments().len()))
    );
    if extraction.segments().is_empty() {
        println!("   {}", dim("(no checkable text)"));
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Start", "Length", "Source", "Text"]);
    for (i, (start, segment)) in extraction.spans().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(start),
            Cell::new(char_len(&segment.text)),
            Cell::new(describe_source(&segment.source)),
            Cell::new(preview(&segment.text, cmd.width)),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}

/// Formats a source reference for the table.
pub fn describe_source(source: &SourceRef) -> String {
    match source {
        SourceRef::Title { field } => format!("title {field}"),
        SourceRef::RichText { handle, .. } => format!("rich text {handle}"),
        SourceRef::PlainField { parent, key, .. } => format!("field {}", parent.key(key)),
    }
}
