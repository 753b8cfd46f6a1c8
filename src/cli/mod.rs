//! Command line interface for fcmacro_release.
//!
//! Parses arguments, builds the packager configuration and version
//! provider, and reports results with colored output.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig, VersionSource};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args)
}
