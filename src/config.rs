//! Packager configuration.
//!
//! Every path the packager touches is resolved up front into a
//! [`PackagerConfig`] so no step depends on the current working directory.

use crate::error::{ReleaseError, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Directory holding macro sources, relative to the repository root
pub const DEFAULT_MACROS_DIR: &str = "macros";
/// Directory receiving the release archive, relative to the repository root
pub const DEFAULT_RELEASE_DIR: &str = "release";
/// Extension the macros are authored with
pub const SOURCE_EXTENSION: &str = ".py";
/// Extension FreeCAD expects for macro files
pub const MACRO_EXTENSION: &str = ".FCMacro";
/// Source file never shipped in a release
pub const PACKAGE_INITIALIZER: &str = "__init__.py";
/// Archive file name prefix, followed by the version and `.zip`
pub const ARCHIVE_PREFIX: &str = "FreeCADMacros_v";

/// Compression applied to archive entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveCompression {
    /// Deflate every entry
    #[default]
    Deflated,
    /// Store entries as-is
    Stored,
}

impl ArchiveCompression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            ArchiveCompression::Deflated => zip::CompressionMethod::Deflated,
            ArchiveCompression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// How intermediate release copies are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackagingStrategy {
    /// Copy into the release directory, archive, then delete each copy
    #[default]
    InPlace,
    /// Copy into a staging directory and persist the archive atomically
    Staged,
}

impl std::fmt::Display for PackagingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackagingStrategy::InPlace => write!(f, "in-place"),
            PackagingStrategy::Staged => write!(f, "staged"),
        }
    }
}

/// Configuration for a packaging run
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Absolute path of the macro sources
    pub macros_dir: PathBuf,
    /// Absolute path of the release output directory
    pub release_dir: PathBuf,
    /// Substring replaced in source names
    pub source_extension: String,
    /// Replacement for `source_extension`
    pub macro_extension: String,
    /// File name excluded from packaging
    pub package_initializer: String,
    /// Archive file name prefix
    pub archive_prefix: String,
    /// Entry compression
    pub compression: ArchiveCompression,
    /// Copy/archive/cleanup strategy
    pub strategy: PackagingStrategy,
}

impl PackagerConfig {
    /// Configuration using the standard `macros/` and `release/` layout under `repo_root`
    pub fn for_repo(repo_root: &Path) -> Result<Self> {
        Self::with_dirs(
            repo_root,
            Path::new(DEFAULT_MACROS_DIR),
            Path::new(DEFAULT_RELEASE_DIR),
        )
    }

    /// Configuration with custom directories; relative paths are joined to `repo_root`
    pub fn with_dirs(repo_root: &Path, macros_dir: &Path, release_dir: &Path) -> Result<Self> {
        let root = absolute(repo_root)?;
        Ok(Self {
            macros_dir: absolute(&root.join(macros_dir))?,
            release_dir: absolute(&root.join(release_dir))?,
            source_extension: SOURCE_EXTENSION.to_string(),
            macro_extension: MACRO_EXTENSION.to_string(),
            package_initializer: PACKAGE_INITIALIZER.to_string(),
            archive_prefix: ARCHIVE_PREFIX.to_string(),
            compression: ArchiveCompression::default(),
            strategy: PackagingStrategy::default(),
        })
    }

    /// Set the packaging strategy
    pub fn strategy(mut self, strategy: PackagingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the entry compression
    pub fn compression(mut self, compression: ArchiveCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Release file name for a macro source name.
    ///
    /// Only the first occurrence of the source extension is replaced.
    pub fn release_name(&self, source_name: &str) -> String {
        source_name.replacen(&self.source_extension, &self.macro_extension, 1)
    }

    /// Archive file name for a version
    pub fn archive_name(&self, version: &str) -> String {
        format!("{}{}.zip", self.archive_prefix, version)
    }

    /// Full archive path for a version
    pub fn archive_path(&self, version: &str) -> PathBuf {
        self.release_dir.join(self.archive_name(version))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| ReleaseError::fs("resolving path", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PackagerConfig {
        PackagerConfig::for_repo(Path::new("/repo")).expect("absolute root resolves")
    }

    #[test]
    fn test_default_layout_is_absolute() {
        let config = config();
        assert_eq!(config.macros_dir, PathBuf::from("/repo/macros"));
        assert_eq!(config.release_dir, PathBuf::from("/repo/release"));
    }

    #[test]
    fn test_relative_root_is_resolved() {
        let config = PackagerConfig::for_repo(Path::new(".")).expect("cwd resolves");
        assert!(config.macros_dir.is_absolute());
        assert!(config.release_dir.ends_with("release"));
    }

    #[test]
    fn test_custom_dirs_normalize_dot_segments() {
        let config = PackagerConfig::with_dirs(
            Path::new("/repo/scripts/.."),
            Path::new("src/macros"),
            Path::new("dist"),
        )
        .expect("absolute root resolves");
        assert_eq!(config.macros_dir, PathBuf::from("/repo/src/macros"));
        assert_eq!(config.release_dir, PathBuf::from("/repo/dist"));
    }

    #[test]
    fn test_release_name_replaces_extension() {
        assert_eq!(config().release_name("export_files.py"), "export_files.FCMacro");
    }

    #[test]
    fn test_release_name_replaces_first_occurrence_only() {
        assert_eq!(config().release_name("a.py.py"), "a.FCMacro.py");
    }

    #[test]
    fn test_release_name_keeps_other_extensions() {
        assert_eq!(config().release_name("README.md"), "README.md");
        assert_eq!(config().release_name("icon.pyc"), "icon.FCMacroc");
    }

    #[test]
    fn test_archive_path() {
        assert_eq!(
            config().archive_path("1.2.3"),
            PathBuf::from("/repo/release/FreeCADMacros_v1.2.3.zip")
        );
    }
}
