//! Command execution functions.
//!
//! Each command reports its own progress; this module turns command results
//! into exit codes and prints recovery suggestions on failure.

mod package;
mod preview;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use package::execute_package;
use preview::execute_preview;

/// Execute the selected command and return the process exit code
pub fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.failure(&format!("Invalid arguments: {}", validation_error), &[]);
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);
    let command = args.command();

    let result = match &command {
        Command::Package { .. } => execute_package(&args, &config),
        Command::Preview => execute_preview(&args, &config),
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            config.failure_println(
                &format!("Command '{}' failed: {}", command.name(), e),
                &e.recovery_suggestions(),
            );
            Ok(1)
        }
    }
}
