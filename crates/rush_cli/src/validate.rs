//! Config file validation.

use std::path::{Path, PathBuf};

use rush_core::prelude::{ConfigError, PlannerConfig};
use tracing::{debug, warn};

use crate::error::Result;

/// Validation result for one file.
#[derive(Debug)]
pub struct FileCheck {
    /// File that was checked.
    pub path: PathBuf,
    /// Why the file was rejected, if it was.
    pub error: Option<ConfigError>,
}

impl FileCheck {
    /// Whether the file loaded and validated.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Validate a single RON config file.
pub fn validate_file(path: &Path) -> FileCheck {
    let error = PlannerConfig::load(path).err();
    match &error {
        Some(e) => warn!(path = %path.display(), error = %e, "invalid config"),
        None => debug!(path = %path.display(), "config ok"),
    }
    FileCheck {
        path: path.to_path_buf(),
        error,
    }
}

/// Validate a config file, or every `.ron` file in a directory.
///
/// Files are checked in name order.
///
/// # Errors
///
/// Returns an error only if the directory cannot be read; per-file problems
/// are reported in the returned checks.
pub fn validate_path(path: &Path) -> Result<Vec<FileCheck>> {
    if !path.is_dir() {
        return Ok(vec![validate_file(path)]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let file = entry?.path();
        if file.extension().is_some_and(|ext| ext == "ron") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files.iter().map(|file| validate_file(file)).collect())
}
