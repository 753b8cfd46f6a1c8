//! Release packaging.
//!
//! Copies every eligible macro source into the release area under its
//! FreeCAD macro name, then bundles the copies into
//! `FreeCADMacros_v<version>.zip`, deleting each copy once it is archived.
//! An archive that already exists for the version is never overwritten.

mod archive;
mod discover;

pub use archive::{ArchiveWriter, copy_preserving};
pub use discover::{MacroSource, discover_macros};

use crate::config::{ArchiveCompression, PackagerConfig, PackagingStrategy};
use crate::error::{ReleaseError, Result};
use crate::version::{ReleaseVersion, VersionProvider};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Seek, Write};
use std::path::{Path, PathBuf};

/// Outcome of a packaging run
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Path of the archive that was written
    pub archive_path: PathBuf,
    /// Version embedded in the archive name
    pub version: ReleaseVersion,
    /// Archive entry names in write order
    pub entries: Vec<String>,
    /// Strategy used for intermediate copies
    pub strategy: PackagingStrategy,
}

/// What a packaging run would do, computed without writing anything
#[derive(Debug, Clone)]
pub struct PackagePlan {
    /// Archive path for the resolved version
    pub archive_path: PathBuf,
    /// Resolved version
    pub version: ReleaseVersion,
    /// Where the version came from
    pub version_source: String,
    /// Macros that would be archived
    pub macros: Vec<MacroSource>,
    /// Whether a run would be refused because the archive exists
    pub archive_exists: bool,
}

/// Build the release archive described by `config`.
pub fn package(config: &PackagerConfig, versions: &dyn VersionProvider) -> Result<PackageReport> {
    fs::create_dir_all(&config.release_dir)
        .map_err(|e| ReleaseError::fs("creating release directory", &config.release_dir, e))?;

    let macros = discover_macros(config)?;
    if macros.is_empty() {
        log::warn!("No macros found in {}", config.macros_dir.display());
    }

    match config.strategy {
        PackagingStrategy::InPlace => package_in_place(config, &macros, versions),
        PackagingStrategy::Staged => package_staged(config, &macros, versions),
    }
}

/// Resolve the version and list the archive contents without touching the filesystem.
pub fn preview(config: &PackagerConfig, versions: &dyn VersionProvider) -> Result<PackagePlan> {
    let macros = discover_macros(config)?;
    let version = versions.resolve()?;
    let archive_path = config.archive_path(version.as_str());
    Ok(PackagePlan {
        archive_exists: archive_path.exists(),
        archive_path,
        version,
        version_source: versions.describe(),
        macros,
    })
}

fn package_in_place(
    config: &PackagerConfig,
    macros: &[MacroSource],
    versions: &dyn VersionProvider,
) -> Result<PackageReport> {
    let release_macros = copy_all(macros, &config.release_dir)?;

    let version = resolve_version(versions)?;
    let archive_path = config.archive_path(version.as_str());
    // Copies stay behind when the archive already exists
    ensure_absent(&archive_path)?;

    let entries = write_archive(&archive_path, &release_macros, config.compression)?;

    log::info!("Wrote {} entries to {}", entries.len(), archive_path.display());
    Ok(PackageReport {
        archive_path,
        version,
        entries,
        strategy: PackagingStrategy::InPlace,
    })
}

fn package_staged(
    config: &PackagerConfig,
    macros: &[MacroSource],
    versions: &dyn VersionProvider,
) -> Result<PackageReport> {
    let version = resolve_version(versions)?;
    let archive_path = config.archive_path(version.as_str());
    ensure_absent(&archive_path)?;

    let staging = tempfile::Builder::new()
        .prefix(".fcmacro-staging-")
        .tempdir_in(&config.release_dir)
        .map_err(|e| ReleaseError::fs("creating staging directory in", &config.release_dir, e))?;
    log::debug!("Staging release copies in {}", staging.path().display());
    let staged = copy_all(macros, staging.path())?;

    let partial = tempfile::Builder::new()
        .prefix(".fcmacro-archive-")
        .suffix(".zip.partial")
        .tempfile_in(&config.release_dir)
        .map_err(|e| ReleaseError::fs("creating temporary archive in", &config.release_dir, e))?;

    let (out, entries) = archive_copies(BufWriter::new(partial), &staged, config.compression)?;
    let partial = out
        .into_inner()
        .map_err(|e| ReleaseError::fs("writing archive", &archive_path, e.into_error()))?;
    partial
        .as_file()
        .sync_all()
        .map_err(|e| ReleaseError::fs("syncing archive", &archive_path, e))?;

    partial
        .persist_noclobber(&archive_path)
        .map_err(|e| open_error(&archive_path, e.error))?;
    staging
        .close()
        .map_err(|e| ReleaseError::fs("removing staging directory in", &config.release_dir, e))?;

    log::info!("Wrote {} entries to {}", entries.len(), archive_path.display());
    Ok(PackageReport {
        archive_path,
        version,
        entries,
        strategy: PackagingStrategy::Staged,
    })
}

/// Create the archive and fill it; a failure removes the partial archive
fn write_archive(
    archive_path: &Path,
    copies: &[PathBuf],
    compression: ArchiveCompression,
) -> Result<Vec<String>> {
    let file = File::create_new(archive_path).map_err(|e| open_error(archive_path, e))?;
    let written = archive_copies(BufWriter::new(file), copies, compression).and_then(
        |(mut out, entries)| {
            out.flush()
                .map_err(|e| ReleaseError::fs("writing archive", archive_path, e))?;
            Ok(entries)
        },
    );

    if written.is_err() {
        if let Err(e) = fs::remove_file(archive_path) {
            log::warn!(
                "Could not remove partial archive {}: {}",
                archive_path.display(),
                e
            );
        }
    }
    written
}

/// Archive each copy, deleting it once it is in the archive
fn archive_copies<W: Write + Seek>(
    inner: W,
    copies: &[PathBuf],
    compression: ArchiveCompression,
) -> Result<(W, Vec<String>)> {
    let mut writer = ArchiveWriter::new(inner, compression);
    for path in copies {
        writer.add_file(path)?;
        fs::remove_file(path).map_err(|e| ReleaseError::fs("removing release copy", path, e))?;
    }
    writer.finish()
}

fn copy_all(macros: &[MacroSource], dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut copies = Vec::with_capacity(macros.len());
    for item in macros {
        let destination = dest_dir.join(&item.release_name);
        copy_preserving(&item.source, &destination)?;
        log::debug!("Copied {} to {}", item.source.display(), destination.display());
        copies.push(destination);
    }
    Ok(copies)
}

fn resolve_version(versions: &dyn VersionProvider) -> Result<ReleaseVersion> {
    let version = versions.resolve()?;
    log::info!("Release version {} (from {})", version, versions.describe());
    Ok(version)
}

fn ensure_absent(archive_path: &Path) -> Result<()> {
    if archive_path.exists() {
        return Err(ReleaseError::ArchiveExists {
            path: archive_path.to_path_buf(),
        });
    }
    Ok(())
}

fn open_error(archive_path: &Path, error: std::io::Error) -> ReleaseError {
    if error.kind() == ErrorKind::AlreadyExists {
        ReleaseError::ArchiveExists {
            path: archive_path.to_path_buf(),
        }
    } else {
        ReleaseError::fs("creating archive", archive_path, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::FixedVersion;

    fn repo_with(files: &[&str]) -> (tempfile::TempDir, PackagerConfig) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let macros = dir.path().join("macros");
        fs::create_dir(&macros).expect("create macros dir");
        for file in files {
            fs::write(macros.join(file), format!("# {file}\n")).expect("write macro");
        }
        let config = PackagerConfig::for_repo(dir.path()).expect("resolve config");
        (dir, config)
    }

    #[test]
    fn test_open_error_maps_already_exists() {
        let err = open_error(Path::new("x.zip"), std::io::Error::from(ErrorKind::AlreadyExists));
        assert!(err.is_precondition());
        let err = open_error(Path::new("x.zip"), std::io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, ReleaseError::Fs { .. }));
    }

    #[test]
    fn test_preview_writes_nothing() {
        let (dir, config) = repo_with(&["a.py", "__init__.py"]);
        let plan = preview(&config, &FixedVersion::new("0.1.0\n")).expect("preview");
        assert_eq!(plan.version.as_str(), "0.1.0");
        assert_eq!(plan.macros.len(), 1);
        assert!(!plan.archive_exists);
        assert!(plan.archive_path.ends_with("FreeCADMacros_v0.1.0.zip"));
        assert!(!dir.path().join("release").exists());
    }

    #[test]
    fn test_in_place_refusal_leaves_copies() {
        let (dir, config) = repo_with(&["a.py"]);
        let release = dir.path().join("release");
        fs::create_dir(&release).expect("create release dir");
        fs::write(release.join("FreeCADMacros_v1.0.0.zip"), "old").expect("write old archive");

        let err = package(&config, &FixedVersion::new("1.0.0")).expect_err("archive exists");
        assert!(err.is_precondition());
        assert!(release.join("a.FCMacro").exists());
        assert_eq!(
            fs::read_to_string(release.join("FreeCADMacros_v1.0.0.zip")).expect("read"),
            "old"
        );
    }

    #[test]
    fn test_staged_refusal_touches_nothing() {
        let (dir, config) = repo_with(&["a.py"]);
        let config = config.strategy(PackagingStrategy::Staged);
        let release = dir.path().join("release");
        fs::create_dir(&release).expect("create release dir");
        fs::write(release.join("FreeCADMacros_v1.0.0.zip"), "old").expect("write old archive");

        let err = package(&config, &FixedVersion::new("1.0.0")).expect_err("archive exists");
        assert!(err.is_precondition());
        let names: Vec<_> = fs::read_dir(&release)
            .expect("list release")
            .filter_map(|e| e.ok().map(|e| e.file_name()))
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_version_failure_keeps_release_dir_clean_when_staged() {
        let (dir, config) = repo_with(&["a.py"]);
        let config = config.strategy(PackagingStrategy::Staged);
        assert!(package(&config, &FixedVersion::new("")).is_err());
        let release = dir.path().join("release");
        assert_eq!(fs::read_dir(&release).expect("list release").count(), 0);
    }

    #[test]
    fn test_staging_dir_removed_when_a_copy_fails() {
        let (dir, config) = repo_with(&["a.py"]);
        let release = dir.path().join("release");
        fs::create_dir(&release).expect("create release dir");
        let macros = vec![
            MacroSource {
                source: dir.path().join("macros").join("a.py"),
                release_name: "a.FCMacro".to_string(),
            },
            MacroSource {
                source: dir.path().join("macros").join("vanished.py"),
                release_name: "vanished.FCMacro".to_string(),
            },
        ];

        let err = package_staged(&config, &macros, &FixedVersion::new("1.0.0"))
            .expect_err("missing source must fail");
        assert!(matches!(err, ReleaseError::Fs { .. }));
        assert_eq!(fs::read_dir(&release).expect("list release").count(), 0);
    }

    #[test]
    fn test_failed_archive_is_removed() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let copy = dir.path().join("a.FCMacro");
        fs::write(&copy, "# a\n").expect("write copy");
        let archive_path = dir.path().join("FreeCADMacros_v1.0.0.zip");

        let copies = vec![copy, dir.path().join("vanished.FCMacro")];
        let err = write_archive(&archive_path, &copies, ArchiveCompression::Deflated)
            .expect_err("missing copy must fail");

        assert!(!err.is_precondition());
        assert!(!archive_path.exists());
    }

    #[test]
    fn test_write_archive_keeps_existing_archive() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let archive_path = dir.path().join("FreeCADMacros_v1.0.0.zip");
        fs::write(&archive_path, "old").expect("write old archive");

        let err = write_archive(&archive_path, &[], ArchiveCompression::Deflated)
            .expect_err("archive exists");

        assert!(err.is_precondition());
        assert_eq!(fs::read_to_string(&archive_path).expect("read"), "old");
    }

    #[test]
    fn test_colliding_release_names_copy_nothing() {
        let (dir, config) = repo_with(&["a.py", "a.FCMacro"]);

        let err = package(&config, &FixedVersion::new("1.0.0")).expect_err("names collide");
        assert!(matches!(
            err,
            ReleaseError::Discovery(crate::error::DiscoveryError::DuplicateReleaseName { .. })
        ));
        let release = dir.path().join("release");
        assert_eq!(fs::read_dir(&release).expect("list release").count(), 0);
    }
}
