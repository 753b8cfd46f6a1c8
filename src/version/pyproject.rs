//! Version lookup straight from `pyproject.toml`, without invoking poetry.

use super::VersionProvider;
use crate::error::{Result, VersionError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct Pyproject {
    tool: Option<Tool>,
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Tool {
    poetry: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    version: Option<String>,
}

/// Reads `[tool.poetry].version`, falling back to `[project].version`
#[derive(Debug, Clone)]
pub struct PyprojectVersion {
    path: PathBuf,
}

impl PyprojectVersion {
    /// Provider for `<repo_root>/pyproject.toml`
    pub fn in_repo(repo_root: &Path) -> Self {
        Self::new(repo_root.join("pyproject.toml"))
    }

    /// Provider for an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn error(&self, reason: impl Into<String>) -> VersionError {
        VersionError::Pyproject {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl VersionProvider for PyprojectVersion {
    fn raw_version(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.error(e.to_string()))?;
        let manifest: Pyproject = toml::from_str(&content).map_err(|e| self.error(e.to_string()))?;

        let poetry = manifest
            .tool
            .and_then(|tool| tool.poetry)
            .and_then(|poetry| poetry.version);
        let version = poetry.or_else(|| manifest.project.and_then(|project| project.version));

        version.ok_or_else(|| self.error("no [tool.poetry] or [project] version").into())
    }

    fn describe(&self) -> String {
        format!("{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    fn write_pyproject(content: &str) -> (tempfile::TempDir, PyprojectVersion) {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("pyproject.toml"), content).expect("write pyproject");
        let provider = PyprojectVersion::in_repo(dir.path());
        (dir, provider)
    }

    #[test]
    fn test_reads_poetry_version() {
        let (_dir, provider) = write_pyproject(
            "[tool.poetry]\nname = \"freecad-macros\"\nversion = \"0.3.1\"\n",
        );
        assert_eq!(provider.resolve().expect("version present").as_str(), "0.3.1");
    }

    #[test]
    fn test_poetry_version_wins_over_project() {
        let (_dir, provider) = write_pyproject(
            "[project]\nversion = \"9.9.9\"\n\n[tool.poetry]\nversion = \"0.3.1\"\n",
        );
        assert_eq!(provider.resolve().expect("version present").as_str(), "0.3.1");
    }

    #[test]
    fn test_falls_back_to_project_version() {
        let (_dir, provider) = write_pyproject("[project]\nname = \"m\"\nversion = \"2.0.0\"\n");
        assert_eq!(provider.resolve().expect("version present").as_str(), "2.0.0");
    }

    #[test]
    fn test_missing_version_is_an_error() {
        let (_dir, provider) = write_pyproject("[tool.black]\nline-length = 88\n");
        assert!(matches!(
            provider.resolve(),
            Err(ReleaseError::Version(VersionError::Pyproject { .. }))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let provider = PyprojectVersion::in_repo(dir.path());
        assert!(provider.raw_version().is_err());
    }
}
