//! # fcmacro_release
//!
//! Release packaging for a FreeCAD macro collection.
//!
//! Macro sources live in `<repo>/macros` as `.py` files. A release copies
//! each one (except `__init__.py`) to a `.FCMacro` file and bundles the
//! copies into `<repo>/release/FreeCADMacros_v<version>.zip`, where the
//! version comes from the project tooling. An archive that already exists
//! for the version is never overwritten.
//!
//! ## Usage
//!
//! ```bash
//! fcmacro_release                         # poetry version -s, in-place copies
//! fcmacro_release package --staged        # atomic archive via a staging directory
//! fcmacro_release preview --set-version 1.2.3
//! ```
//!
//! ## Library
//!
//! ```no_run
//! use fcmacro_release::{FixedVersion, PackagerConfig, package};
//! use std::path::Path;
//!
//! let config = PackagerConfig::for_repo(Path::new("."))?;
//! let report = package(&config, &FixedVersion::new("1.2.3"))?;
//! println!("{}", report.archive_path.display());
//! # Ok::<(), fcmacro_release::ReleaseError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod packager;
pub mod version;

pub use cli::Args;
pub use config::{ArchiveCompression, PackagerConfig, PackagingStrategy};
pub use error::{ReleaseError, Result};
pub use packager::{MacroSource, PackagePlan, PackageReport, package, preview};
pub use version::{CommandVersion, FixedVersion, PyprojectVersion, ReleaseVersion, VersionProvider};
