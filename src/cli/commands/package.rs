//! Package command implementation.
//!
//! Builds the release archive from the macros directory.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::packager;

/// Execute package command
pub(super) fn execute_package(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let packager_config = args.packager_config()?;
    let versions = args.version_provider()?;

    log::debug!(
        "Packaging {} into {} ({} strategy)",
        packager_config.macros_dir.display(),
        packager_config.release_dir.display(),
        packager_config.strategy
    );

    let report = packager::package(&packager_config, versions.as_ref())?;

    if report.entries.is_empty() {
        config.warning_println("Archive contains no macros");
    }
    for entry in &report.entries {
        config.indent(entry);
    }
    config.success_println(&format!(
        "Release zip file '{}' created.",
        report.archive_path.display()
    ));

    Ok(())
}
