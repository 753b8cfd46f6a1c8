//! Preview command implementation.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::packager;

/// Execute preview command
pub(super) fn execute_preview(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let packager_config = args.packager_config()?;
    let versions = args.version_provider()?;
    let plan = packager::preview(&packager_config, versions.as_ref())?;

    config.println("Release preview");
    config.println(&format!("Version: {} (from {})", plan.version, plan.version_source));
    config.println(&format!("Archive: {}", plan.archive_path.display()));
    config.println(&format!("Macros ({}):", plan.macros.len()));
    for item in &plan.macros {
        let source_name = item
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        config.indent(&format!("{} -> {}", source_name, item.release_name));
    }

    if plan.archive_exists {
        config.warning_println(&format!(
            "Zip file '{}' already exists. Did you change version?",
            plan.archive_path.display()
        ));
    }

    Ok(())
}
