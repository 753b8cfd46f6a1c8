//! Error types for fcmacro_release operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fcmacro_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all fcmacro_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// The release archive for this version was already built
    #[error("Zip file '{}' already exists.\nDid you change version?", .path.display())]
    ArchiveExists {
        /// Path of the existing archive
        path: PathBuf,
    },

    /// File system error with path context
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// Operation that failed (e.g. "copying macro")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Macro discovery errors
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Version lookup errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// ZIP archive creation errors
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while enumerating the macros directory
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Macros directory does not exist
    #[error("Macros directory not found at {}", .path.display())]
    MissingMacrosDir {
        /// Expected location of the macros directory
        path: PathBuf,
    },

    /// Entry name cannot be used as an archive entry name
    #[error("Macro file name is not valid UTF-8: {}", .path.display())]
    NonUtf8Name {
        /// Offending path
        path: PathBuf,
    },

    /// Release copies would land on top of the macro sources
    #[error("Release directory {} is the macros directory", .path.display())]
    ReleaseDirIsMacrosDir {
        /// The shared directory
        path: PathBuf,
    },

    /// Two macro sources map to the same release file name
    #[error(
        "Macros {} and {} would both be released as '{name}'",
        .first.display(),
        .second.display()
    )]
    DuplicateReleaseName {
        /// Shared release file name
        name: String,
        /// First source with that release name
        first: PathBuf,
        /// Second source with that release name
        second: PathBuf,
    },
}

/// Version lookup errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Version tool executable not found on PATH
    #[error("Version tool '{program}' not found: {reason}")]
    ToolNotFound {
        /// Program name
        program: String,
        /// Reason reported by the lookup
        reason: String,
    },

    /// Version tool could not be started
    #[error("Failed to run '{command}': {source}")]
    SpawnFailed {
        /// Full command line
        command: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },

    /// Version tool exited unsuccessfully
    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        /// Full command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// Version provider produced nothing
    #[error("Version provider returned an empty version")]
    Empty,

    /// Version cannot be used in an archive file name
    #[error("Invalid version '{version}': {reason}")]
    Invalid {
        /// Version string
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// pyproject.toml could not be read or has no version
    #[error("Could not read version from {}: {reason}", .path.display())]
    Pyproject {
        /// Path to pyproject.toml
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Wrap an I/O error with the operation and path it came from
    pub fn fs(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReleaseError::Fs {
            context,
            path: path.into(),
            source,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::ArchiveExists { .. } => vec![
                "Bump the project version: poetry version patch".to_string(),
                "Or delete the existing archive if it must be rebuilt".to_string(),
            ],
            ReleaseError::Version(VersionError::ToolNotFound { program, .. }) => vec![
                format!("Install '{}' or put it on PATH", program),
                "Use --version-from pyproject to read pyproject.toml directly".to_string(),
                "Use --set-version <VERSION> to pass the version explicitly".to_string(),
            ],
            ReleaseError::Version(VersionError::CommandFailed { .. } | VersionError::Empty) => {
                vec![
                    "Run the version command by hand to inspect its output".to_string(),
                    "Check that pyproject.toml declares a version".to_string(),
                ]
            }
            ReleaseError::Discovery(DiscoveryError::MissingMacrosDir { .. }) => vec![
                "Run from the repository root or pass --repo-root".to_string(),
                "Point --macros-dir at the directory holding the macro sources".to_string(),
            ],
            ReleaseError::Discovery(DiscoveryError::ReleaseDirIsMacrosDir { .. }) => vec![
                "Point --release-dir outside the macros directory".to_string(),
            ],
            ReleaseError::Discovery(DiscoveryError::DuplicateReleaseName { second, .. }) => vec![
                format!("Rename or remove {}", second.display()),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is a precondition refusal rather than a fault
    pub fn is_precondition(&self) -> bool {
        matches!(self, ReleaseError::ArchiveExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_exists_message_asks_for_version_change() {
        let err = ReleaseError::ArchiveExists {
            path: PathBuf::from("release/FreeCADMacros_v1.0.0.zip"),
        };
        let msg = err.to_string();
        assert!(msg.contains("FreeCADMacros_v1.0.0.zip"));
        assert!(msg.contains("Did you change version?"));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_fs_error_carries_path() {
        let err = ReleaseError::fs(
            "copying macro",
            "macros/a.py",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().starts_with("copying macro macros/a.py"));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_tool_not_found_suggests_alternatives() {
        let err = ReleaseError::Version(VersionError::ToolNotFound {
            program: "poetry".to_string(),
            reason: "cannot find binary path".to_string(),
        });
        let suggestions = err.recovery_suggestions();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].contains("poetry"));
    }
}
