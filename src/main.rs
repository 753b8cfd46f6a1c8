//! fcmacro_release - package FreeCAD macros into a version-stamped archive.

use fcmacro_release::cli;
use fcmacro_release::cli::OutputManager;
use std::process;

fn main() {
    env_logger::init();

    match cli::run() {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            OutputManager::new(false)
                .failure(&format!("Fatal error: {e}"), &e.recovery_suggestions());
            process::exit(1);
        }
    }
}
