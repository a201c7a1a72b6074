//! Implementation of `redline apply`.

use std::{fs, path::Path, process::ExitCode, time::Duration};

use redline_check::{AllowList, Issue, IssueOutcome, StaticWords, apply_issues};
use redline_document::extract;
use redline_highlight::{dim, error, subheader, success, warning};

use super::shared::write_document;
use crate::cli::{args::ApplyCommand, context::CommandContext};

/// Reads a JSON array of checker issues.
fn read_issues(path: &Path) -> Result<Vec<Issue>, ExitCode> {
    let content = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        ExitCode::FAILURE
    })?;
    serde_json::from_str(&content).map_err(|e| {
        eprintln!("error: failed to parse issues in {}: {e}", path.display());
        ExitCode::FAILURE
    })
}

/// Applies checker issues to a document and prints what happened to each.
///
/// Issues covering an allow-listed word are dropped first. Fails if any issue with a
/// suggestion could not be applied; the corrections that did apply are still written.
pub fn run(ctx: &CommandContext, cmd: &ApplyCommand) -> ExitCode {
    let issues = match read_issues(&ctx.resolve(&cmd.issues)) {
        Ok(issues) => issues,
        Err(code) => return code,
    };
    let mut document = match ctx.read_document(&cmd.document) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let options = ctx.extract_options(&cmd.document);

    let reported = issues.len();
    let flat_text = extract(&document, &options).flat_text().to_string();
    let check = &ctx.config.check;
    let mut allow_list = AllowList::new(
        StaticWords(check.allow_words.clone()),
        Duration::from_secs(check.allow_list_ttl_secs),
    );
    let issues = allow_list.filter_issues(&flat_text, issues);
    let allowed = reported - issues.len();

    let outcomes = apply_issues(&mut document, issues, &options);

    println!("{}", subheader(&format!("Issues ({}):", outcomes.len())));
    for outcome in &outcomes {
        println!("   {}", describe(outcome));
    }
    println!();

    let applied = outcomes.iter().filter(|o| o.is_applied()).count();
    let failed = outcomes
        .iter()
        .filter(|o| o.result.as_ref().is_some_and(|r| !r.applied))
        .count();
    let skipped = outcomes.len() - applied - failed;
    println!(
        "{applied} applied, {failed} not applied, {skipped} without suggestion, {allowed} allowed"
    );

    if applied > 0
        && let Err(code) = write_document(ctx, &document, &cmd.document, &cmd.write)
    {
        return code;
    }

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Formats one issue outcome as a status line.
fn describe(outcome: &IssueOutcome) -> String {
    let issue = &outcome.issue;
    let position = dim(&format!("@{}+{}", issue.offset, issue.length));
    let suggestion = issue
        .suggested_replacements
        .first()
        .map(String::as_str)
        .unwrap_or_default();
    match &outcome.result {
        Some(result) if result.applied => format!(
            "{} {position} -> {suggestion:?} {}",
            success("applied"),
            dim(&format!("({:?})", result.method).to_lowercase())
        ),
        Some(_) => format!("{} {position} -> {suggestion:?}", error("not applied")),
        None => format!("{} {position} {}", warning("no suggestion"), issue.message),
    }
}
