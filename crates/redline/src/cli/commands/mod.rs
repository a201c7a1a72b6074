//! Command implementations and dispatch.

pub mod apply;
pub mod config;
pub mod extract;
pub mod fix;
pub mod init;
pub mod inspect;
pub mod locate;
mod shared;
pub mod validate;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: &Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Extract(cmd) => extract::run(ctx, cmd),
        Commands::Inspect(cmd) => inspect::run(ctx, cmd),
        Commands::Locate(cmd) => locate::run(ctx, cmd),
        Commands::Fix(cmd) => fix::run(ctx, cmd),
        Commands::Apply(cmd) => apply::run(ctx, cmd),
        Commands::Init(cmd) => init::run(ctx, cmd),
        Commands::Config => config::run(ctx),
        Commands::Validate => validate::run(ctx),
    }
}
