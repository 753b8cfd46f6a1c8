//! Macro source discovery.

use crate::config::PackagerConfig;
use crate::error::{DiscoveryError, ReleaseError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A macro source file and the name it is released under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSource {
    /// Path of the source file in the macros directory
    pub source: PathBuf,
    /// File name of the release copy
    pub release_name: String,
}

/// List eligible macro sources, sorted by file name.
///
/// Every regular file except the package initializer is eligible; the
/// extension is not checked. Directories such as `__pycache__` are skipped.
/// Fails before anything is copied when a release copy would overwrite a
/// source or another release copy.
pub fn discover_macros(config: &PackagerConfig) -> Result<Vec<MacroSource>> {
    if !config.macros_dir.is_dir() {
        return Err(DiscoveryError::MissingMacrosDir {
            path: config.macros_dir.clone(),
        }
        .into());
    }
    if same_dir(&config.macros_dir, &config.release_dir) {
        return Err(DiscoveryError::ReleaseDirIsMacrosDir {
            path: config.macros_dir.clone(),
        }
        .into());
    }

    let entries = std::fs::read_dir(&config.macros_dir)
        .map_err(|e| ReleaseError::fs("listing macros in", &config.macros_dir, e))?;

    let mut macros = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| ReleaseError::fs("listing macros in", &config.macros_dir, e))?;
        let path = entry.path();

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            return Err(DiscoveryError::NonUtf8Name { path }.into());
        };

        if name == config.package_initializer {
            log::debug!("Skipping package initializer {}", path.display());
            continue;
        }

        // file_type() does not follow symlinks; metadata() does
        let is_file = std::fs::metadata(&path)
            .map_err(|e| ReleaseError::fs("reading metadata of", &path, e))?
            .is_file();
        if !is_file {
            log::debug!("Skipping non-file entry {}", path.display());
            continue;
        }

        let release_name = config.release_name(name);
        if config.release_dir.join(&release_name) == path {
            return Err(DiscoveryError::ReleaseDirIsMacrosDir {
                path: config.macros_dir.clone(),
            }
            .into());
        }

        macros.push(MacroSource {
            release_name,
            source: path,
        });
    }

    macros.sort_by(|a, b| a.source.file_name().cmp(&b.source.file_name()));
    reject_duplicate_names(&macros)?;
    log::info!(
        "Found {} macro(s) in {}",
        macros.len(),
        config.macros_dir.display()
    );
    Ok(macros)
}

/// Equal paths, or both exist and resolve to the same directory
fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn reject_duplicate_names(macros: &[MacroSource]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for item in macros {
        if let Some(first) = seen.insert(&item.release_name, &item.source) {
            return Err(DiscoveryError::DuplicateReleaseName {
                name: item.release_name.clone(),
                first: first.to_path_buf(),
                second: item.source.clone(),
            }
            .into());
        }
    }
    Ok(())
}
