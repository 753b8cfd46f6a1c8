//! Version lookup through an external command (`poetry version -s` by default).

use super::VersionProvider;
use crate::error::{CliError, Result, VersionError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Command line run by default to obtain the project version
pub const DEFAULT_VERSION_COMMAND: &str = "poetry version -s";

/// Runs a command in the repository root and uses its stdout as the version
#[derive(Debug, Clone)]
pub struct CommandVersion {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandVersion {
    /// Parse a whitespace-separated command line
    pub fn parse(command_line: &str, working_dir: &Path) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| CliError::InvalidArguments {
            reason: "version command is empty".to_string(),
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
            working_dir: working_dir.to_path_buf(),
        })
    }

    /// `poetry version -s` run in `working_dir`
    pub fn poetry(working_dir: &Path) -> Self {
        Self {
            program: "poetry".to_string(),
            args: vec!["version".to_string(), "-s".to_string()],
            working_dir: working_dir.to_path_buf(),
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl VersionProvider for CommandVersion {
    fn raw_version(&self) -> Result<String> {
        let program = which::which(&self.program).map_err(|e| VersionError::ToolNotFound {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;

        log::debug!("Running '{}' in {}", self.command_line(), self.working_dir.display());

        let output = Command::new(&program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| VersionError::SpawnFailed {
                command: self.command_line(),
                source,
            })?;

        if !output.status.success() {
            return Err(VersionError::CommandFailed {
                command: self.command_line(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn describe(&self) -> String {
        format!("command '{}'", self.command_line())
    }
}
