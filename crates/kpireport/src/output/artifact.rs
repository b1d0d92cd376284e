//! Report file placement.
//!
//! Bytes land in a `.partial` sibling first and are renamed into place, so
//! a failed or interrupted run never leaves a file under the final name.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use kpireport_core::DateRange;
use tracing::{debug, info};

use crate::cli::ReportFormat;

/// `kpi_report_<start>--<end>.<ext>` for the primary window.
pub fn file_name(window: DateRange, format: ReportFormat) -> String {
    format!("kpi_report_{window}.{}", format.extension())
}

/// Where an in-progress write goes.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Remove `path`; a file that is already gone is not an error.
pub fn delete_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale file");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Write `bytes` to `path` through a `.partial` sibling.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let partial = partial_path(path);
    delete_if_exists(&partial)?;
    if let Err(err) = std::fs::write(&partial, bytes).and_then(|()| std::fs::rename(&partial, path))
    {
        let _ = delete_if_exists(&partial);
        return Err(err);
    }
    info!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}
