//! Clap argument definitions for the `redline` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "redline")]
#[command(about = "Flatten CMS documents for a language checker and write corrections back")]
pub struct Cli {
    /// Log verbosity (-v for debug, -vv for trace); REDLINE_LOG overrides
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// The document a command reads.
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// JSON document to read
    pub file: PathBuf,

    /// Top-level rich-text field to use instead of the configured one
    #[arg(long)]
    pub content_field: Option<String>,
}

/// Where a modified document is written.
#[derive(Args, Debug, Clone, Default)]
pub struct WriteArgs {
    /// Write the corrected document to this path
    #[arg(short = 'o', long, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input document
    #[arg(long)]
    pub in_place: bool,
}

/// Arguments for `redline extract`.
#[derive(Args, Debug, Clone)]
pub struct ExtractCommand {
    #[command(flatten)]
    /// Document to extract.
    pub document: DocumentArgs,

    /// Output flat text, offsets and segment sources as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `redline inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectCommand {
    #[command(flatten)]
    /// Document to inspect.
    pub document: DocumentArgs,

    /// Preview width in characters
    #[arg(long, default_value = "48")]
    pub width: usize,
}

/// Arguments for `redline locate`.
#[derive(Args, Debug, Clone)]
pub struct LocateCommand {
    #[command(flatten)]
    /// Document the offset refers to.
    pub document: DocumentArgs,

    /// Character offset in the flat text
    #[arg(long)]
    pub offset: usize,

    /// Length of the range in characters
    #[arg(long, default_value = "1")]
    pub length: usize,
}

/// Arguments for `redline fix`.
#[derive(Args, Debug, Clone)]
pub struct FixCommand {
    #[command(flatten)]
    /// Document to correct.
    pub document: DocumentArgs,

    /// Text the checker flagged
    #[arg(long)]
    pub original: String,

    /// Text to put in its place
    #[arg(long)]
    pub replacement: String,

    /// Character offset of the flagged text in the flat text
    #[arg(long)]
    pub offset: Option<usize>,

    /// Length of the flagged range [default: length of --original]
    #[arg(long, requires = "offset")]
    pub length: Option<usize>,

    /// Restrict the fallback search to one top-level field
    #[arg(long)]
    pub field: Option<String>,

    #[command(flatten)]
    /// Output destination.
    pub write: WriteArgs,
}

/// Arguments for `redline apply`.
#[derive(Args, Debug, Clone)]
pub struct ApplyCommand {
    #[command(flatten)]
    /// Document to correct.
    pub document: DocumentArgs,

    /// JSON array of checker issues reported against this document's flat text
    #[arg(long)]
    pub issues: PathBuf,

    #[command(flatten)]
    /// Output destination.
    pub write: WriteArgs,
}

/// Arguments for `redline init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.redline.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `redline` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the flat text submitted to the checker
    Extract(ExtractCommand),

    /// Show the segments behind the flat text
    Inspect(InspectCommand),

    /// Map a flat-text offset back to its segment
    Locate(LocateCommand),

    /// Apply one correction to a document
    #[command(after_help = "\
RESOLUTION:
  With --offset, the text at that offset is compared with --original. On a match the
  correction lands there. Otherwise the occurrence of --original nearest to the offset
  is used. Without --offset, or when --original no longer occurs, the first match in
  document order is replaced (restricted to --field when given).

EXAMPLES:
  redline fix page.json --original une --replacement un --offset 15
  redline fix page.json --original Apellez --replacement Appelez --field layout --in-place")]
    Fix(FixCommand),

    /// Apply a checker's issues to a document
    Apply(ApplyCommand),

    /// Initialize redline configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Validate,
}
