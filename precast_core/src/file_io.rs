//! # File I/O Module
//!
//! Snapshot persistence for workbooks. The whole [`Workbook`] is serialized
//! on every save; there are no partial updates.
//!
//! - **Replace on save**: write to `.tmp`, sync, rename over the target
//! - **Version validation**: refuse files written by a newer schema
//!
//! ## File Format
//!
//! Workbooks are saved as `.pcw` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use precast_core::file_io::{load_workbook, save_workbook};
//! use precast_core::workbook::Workbook;
//! use std::path::Path;
//!
//! let workbook = Workbook::new("North Plant");
//! save_workbook(&workbook, Path::new("plant.pcw"))?;
//!
//! let loaded = load_workbook(Path::new("plant.pcw"))?;
//! assert_eq!(loaded.meta.owner, "North Plant");
//! # Ok::<(), precast_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::workbook::{Workbook, SCHEMA_VERSION};

/// File extension for workbooks
pub const WORKBOOK_EXTENSION: &str = "pcw";

/// Temp file written next to `path` during a save
fn temp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Save a workbook to a file.
///
/// The save process:
/// 1. Serialize workbook to JSON
/// 2. Write to a temporary file (`<path>.tmp`)
/// 3. Sync to disk
/// 4. Rename the temp file over `path`
pub fn save_workbook(workbook: &Workbook, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(workbook)?;

    let tmp_path = temp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(
        path = %path.display(),
        forms = workbook.forms.len(),
        calculations = workbook.calculations.len(),
        "workbook saved"
    );
    Ok(())
}

/// Load a workbook from a file.
///
/// # Returns
///
/// * `Ok(Workbook)` - Successfully loaded workbook
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_workbook(path: &Path) -> CalcResult<Workbook> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let workbook: Workbook =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&workbook.meta.version)?;

    info!(path = %path.display(), version = %workbook.meta.version, "workbook loaded");
    Ok(workbook)
}

/// Load a workbook if the file exists, otherwise start a new one.
pub fn load_or_create(path: &Path, owner: &str) -> CalcResult<Workbook> {
    if path.exists() {
        load_workbook(path)
    } else {
        debug!(path = %path.display(), "no workbook on disk, starting new");
        Ok(Workbook::new(owner))
    }
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor means a format we do not understand
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
