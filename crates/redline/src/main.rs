//! Command-line interface for `redline`.

use std::{io, process::ExitCode};

use clap::Parser;
use redline::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "REDLINE_LOG";

/// Installs the stderr log subscriber.
///
/// `REDLINE_LOG` wins over `-v`; without either only warnings are shown.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(ctx) => commands::run(&cli.command, &ctx),
        Err(code) => code,
    }
}
