//! CLI support for the `redline` binary.

pub mod args;
pub mod commands;
pub mod context;

pub use context::CommandContext;
