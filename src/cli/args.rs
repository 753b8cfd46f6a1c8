//! Command line argument parsing and validation.
//!
//! Run it from the macro repository root and it produces the release archive.

use crate::config::{ArchiveCompression, PackagerConfig, PackagingStrategy};
use crate::error::Result;
use crate::version::{
    CommandVersion, DEFAULT_VERSION_COMMAND, FixedVersion, PyprojectVersion, VersionProvider,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Package FreeCAD macros into a version-stamped release archive
#[derive(Parser, Debug)]
#[command(
    name = "fcmacro_release",
    version,
    about = "Package FreeCAD macros into a version-stamped release archive",
    long_about = "Copy every macro in <repo>/macros to a .FCMacro file and bundle the
copies into <repo>/release/FreeCADMacros_v<version>.zip.

Usage:
  fcmacro_release
  fcmacro_release --repo-root /path/to/FreeCADMacros package --staged
  fcmacro_release preview --version-from pyproject"
)]
pub struct Args {
    /// Command to run (defaults to `package`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Repository root holding the macros and release directories
    #[arg(long, global = true, env = "FCMACRO_REPO_ROOT", default_value = ".")]
    pub repo_root: PathBuf,

    /// Macros directory, relative to the repository root
    #[arg(long, global = true, default_value = crate::config::DEFAULT_MACROS_DIR)]
    pub macros_dir: PathBuf,

    /// Release directory, relative to the repository root
    #[arg(long, global = true, default_value = crate::config::DEFAULT_RELEASE_DIR)]
    pub release_dir: PathBuf,

    /// Use this version instead of asking the version tool
    #[arg(long, global = true, value_name = "VERSION")]
    pub set_version: Option<String>,

    /// Where to read the project version from
    #[arg(long, global = true, value_enum, default_value_t = VersionSource::Command)]
    pub version_from: VersionSource,

    /// Command printing the project version on stdout
    #[arg(
        long,
        global = true,
        env = "FCMACRO_VERSION_COMMAND",
        default_value = DEFAULT_VERSION_COMMAND
    )]
    pub version_command: String,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build the release archive
    Package {
        /// Stage copies in a temporary directory and persist the archive atomically
        #[arg(long)]
        staged: bool,

        /// Store entries uncompressed
        #[arg(long)]
        store: bool,
    },

    /// Show what would be packaged without writing anything
    Preview,
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Package { .. } => "package",
            Command::Preview => "preview",
        }
    }
}

/// Version provider selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Run the version command
    Command,
    /// Read pyproject.toml
    Pyproject,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Command to run, `package` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Package {
            staged: false,
            store: false,
        })
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.version_command.trim().is_empty() {
            return Err("--version-command must not be empty".to_string());
        }
        if self.set_version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err("--set-version must not be empty".to_string());
        }
        Ok(())
    }

    /// Build the packager configuration
    pub fn packager_config(&self) -> Result<PackagerConfig> {
        let mut config =
            PackagerConfig::with_dirs(&self.repo_root, &self.macros_dir, &self.release_dir)?;
        if let Command::Package { staged, store } = self.command() {
            if staged {
                config = config.strategy(PackagingStrategy::Staged);
            }
            if store {
                config = config.compression(ArchiveCompression::Stored);
            }
        }
        Ok(config)
    }

    /// Build the version provider selected by the arguments
    pub fn version_provider(&self) -> Result<Box<dyn VersionProvider>> {
        if let Some(version) = &self.set_version {
            return Ok(Box::new(FixedVersion::new(version.clone())));
        }
        let provider: Box<dyn VersionProvider> = match self.version_from {
            VersionSource::Command => {
                Box::new(CommandVersion::parse(&self.version_command, &self.repo_root)?)
            }
            VersionSource::Pyproject => Box::new(PyprojectVersion::in_repo(&self.repo_root)),
        };
        Ok(provider)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
        }
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print an error with its recovery suggestions (always shown)
    pub fn failure_println(&self, message: &str, suggestions: &[String]) {
        self.output.failure(message, suggestions);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet)
    }
}
