//! Release copies and flat ZIP archive writing.

use crate::config::ArchiveCompression;
use crate::error::{ReleaseError, Result};
use chrono::{Datelike, Timelike};
use std::fs::{self, File, FileTimes};
use std::io::{Seek, Write};
use std::path::Path;
use std::time::SystemTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Copy a file, keeping its permissions and access/modification times.
pub fn copy_preserving(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|e| ReleaseError::fs("copying macro", from, e))?;

    let metadata =
        fs::metadata(from).map_err(|e| ReleaseError::fs("reading metadata of", from, e))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    File::options()
        .write(true)
        .open(to)
        .and_then(|file| file.set_times(times))
        .map_err(|e| ReleaseError::fs("setting file times on", to, e))
}

/// Writes files into a ZIP archive under their base names
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    compression: ArchiveCompression,
    entries: Vec<String>,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Start a new archive on `inner`
    pub fn new(inner: W, compression: ArchiveCompression) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            compression,
            entries: Vec::new(),
        }
    }

    /// Add `path` as a top-level entry named after its file name
    pub fn add_file(&mut self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ReleaseError::fs(
                    "naming archive entry for",
                    path,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "no UTF-8 file name"),
                )
            })?
            .to_string();

        let metadata =
            fs::metadata(path).map_err(|e| ReleaseError::fs("reading metadata of", path, e))?;
        let mut options =
            SimpleFileOptions::default().compression_method(self.compression.method());
        if let Some(time) = metadata.modified().ok().and_then(entry_time) {
            options = options.last_modified_time(time);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            options = options.unix_permissions(metadata.permissions().mode() & 0o7777);
        }

        let mut file = File::open(path).map_err(|e| ReleaseError::fs("opening", path, e))?;
        self.zip.start_file(name.as_str(), options)?;
        std::io::copy(&mut file, &mut self.zip)
            .map_err(|e| ReleaseError::fs("archiving", path, e))?;

        log::debug!("Archived {} as {}", path.display(), name);
        self.entries.push(name.clone());
        Ok(name)
    }

    /// Write the central directory and return the entry names in order
    pub fn finish(self) -> Result<(W, Vec<String>)> {
        let inner = self.zip.finish()?;
        Ok((inner, self.entries))
    }
}

/// ZIP timestamps are local time, limited to 1980..=2107
fn entry_time(modified: SystemTime) -> Option<zip::DateTime> {
    let local: chrono::DateTime<chrono::Local> = modified.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}
