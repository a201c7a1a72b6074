//! Implementation of `redline extract`.

use std::process::ExitCode;

use redline_check::truncate_chars;
use redline_document::{Extraction, SourceRef, extract, text::char_len};
use serde::Serialize;

use super::shared::print_json;
use crate::cli::{args::ExtractCommand, context::CommandContext};

/// JSON form of one segment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSegment<'a> {
    /// Untrimmed start of the segment in the joined text.
    start: usize,
    /// Segment length in characters.
    length: usize,
    /// Segment text.
    text: &'a str,
    /// Where the text lives in the document.
    source: &'a SourceRef,
}

/// JSON form of an extraction.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExtraction<'a> {
    /// Trimmed flat text.
    flat_text: &'a str,
    /// Characters trimmed from the front of the join.
    trim_delta: usize,
    /// Fingerprint of the flat text.
    fingerprint: String,
    /// Segments in traversal order.
    segments: Vec<JsonSegment<'a>>,
}

impl<'a> JsonExtraction<'a> {
    /// Borrows an extraction for serialization.
    fn new(extraction: &'a Extraction) -> Self {
        let segments = extraction
            .spans()
            .map(|(start, segment)| JsonSegment {
                start,
                length: char_len(&segment.text),
                text: &segment.text,
                source: &segment.source,
            })
            .collect();
        Self {
            flat_text: extraction.flat_text(),
            trim_delta: extraction.trim_delta(),
            fingerprint: extraction.fingerprint(),
            segments,
        }
    }
}

/// Prints the flat text of a document, or its full extraction as JSON.
pub fn run(ctx: &CommandContext, cmd: &ExtractCommand) -> ExitCode {
    let document = match ctx.read_document(&cmd.document) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let extraction = extract(&document, &ctx.extract_options(&cmd.document));

    if cmd.json {
        return match print_json(&JsonExtraction::new(&extraction)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(code) => code,
        };
    }

    let max = ctx.config.check.max_text_length;
    let submitted = truncate_chars(extraction.flat_text(), max);
    if submitted.len() < extraction.flat_text().len() {
        eprintln!(
            "warning: flat text is {} characters, only the first {max} are checked",
            extraction.len()
        );
    }
    println!("{submitted}");
    ExitCode::SUCCESS
}
