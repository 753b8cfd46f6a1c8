//! Version lookup for release archives.
//!
//! The archive name embeds the project version. Where that version comes
//! from is abstracted behind [`VersionProvider`] so a run can ask the
//! project tooling, read `pyproject.toml` directly, or use a fixed value.

mod command;
mod pyproject;

pub use command::{CommandVersion, DEFAULT_VERSION_COMMAND};
pub use pyproject::PyprojectVersion;

use crate::error::{Result, VersionError};
use std::fmt;

/// Source of the release version string
pub trait VersionProvider {
    /// Raw version output, before trimming
    fn raw_version(&self) -> Result<String>;

    /// Short description for log and preview output
    fn describe(&self) -> String;

    /// Resolve the version, trimming trailing whitespace
    fn resolve(&self) -> Result<ReleaseVersion> {
        ReleaseVersion::new(&self.raw_version()?)
    }
}

/// Version passed in explicitly
#[derive(Debug, Clone)]
pub struct FixedVersion(String);

impl FixedVersion {
    /// Create a provider that always returns `version`
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl VersionProvider for FixedVersion {
    fn raw_version(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("fixed version '{}'", self.0.trim_end())
    }
}

/// Version token used verbatim in the archive name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Trim trailing whitespace and check the token is usable as a file name part.
    ///
    /// Versions that are not semver (PEP 440 pre-releases, for instance) are
    /// accepted as-is.
    pub fn new(raw: &str) -> Result<Self> {
        let version = raw.trim_end();
        if version.is_empty() {
            return Err(VersionError::Empty.into());
        }
        if version.contains(['/', '\\']) || version.contains(char::is_control) {
            return Err(VersionError::Invalid {
                version: version.to_string(),
                reason: "contains path separators or control characters".to_string(),
            }
            .into());
        }
        if semver::Version::parse(version).is_err() {
            log::warn!("Version '{}' is not a semantic version, using it verbatim", version);
        }
        Ok(Self(version.to_string()))
    }

    /// Version as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    #[test]
    fn test_trailing_newline_is_trimmed() {
        let version = FixedVersion::new("1.2.3\n").resolve().expect("valid version");
        assert_eq!(version.as_str(), "1.2.3");
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let version = ReleaseVersion::new("0.4.0 \r\n\t").expect("trimmed version");
        assert_eq!(version.as_str(), "0.4.0");
    }

    #[test]
    fn test_non_semver_is_accepted() {
        let version = ReleaseVersion::new("1.0a1").expect("non-semver version");
        assert_eq!(version.as_str(), "1.0a1");
    }

    #[test]
    fn test_empty_version_is_rejected() {
        assert!(matches!(
            ReleaseVersion::new(" \n"),
            Err(ReleaseError::Version(VersionError::Empty))
        ));
    }

    #[test]
    fn test_path_separator_is_rejected() {
        assert!(matches!(
            ReleaseVersion::new("../1.0"),
            Err(ReleaseError::Version(VersionError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_fixed_describe() {
        assert_eq!(FixedVersion::new("2.0.0\n").describe(), "fixed version '2.0.0'");
    }
}
