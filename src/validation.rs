//! Path-component validation for caller-supplied names.
//!
//! Subsystem directories and file names arrive from command-handler code
//! (ultimately from configuration, not end users), but everything that
//! ends up in a filesystem path is still checked: no traversal components,
//! no absolute paths, no control characters.

use crate::error::StoreError;
use std::path::{Path, PathBuf};

/// Validate one path segment (a directory or file name, no separators).
fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::InvalidName("empty path segment".to_string()));
    }
    if segment == "." || segment == ".." {
        return Err(StoreError::InvalidName(format!(
            "traversal segment '{}'",
            segment
        )));
    }
    if segment.contains('\\') {
        return Err(StoreError::InvalidName(format!(
            "backslash in segment '{}'",
            segment
        )));
    }
    if segment.chars().any(|c| c.is_control()) {
        return Err(StoreError::InvalidName(
            "control character in path segment".to_string(),
        ));
    }
    Ok(())
}

/// Validate a relative subdir. Forward slashes separate segments
/// (e.g. `"city/personal"`); each segment is checked individually.
pub fn validate_subdir(subdir: &str) -> Result<(), StoreError> {
    if subdir.starts_with('/') {
        return Err(StoreError::InvalidName(format!(
            "subdir '{}' must be relative",
            subdir
        )));
    }
    for segment in subdir.split('/') {
        validate_segment(segment)?;
    }
    Ok(())
}

/// Validate a file name (a single segment, no separators at all).
pub fn validate_file_name(name: &str) -> Result<(), StoreError> {
    if name.contains('/') {
        return Err(StoreError::InvalidName(format!(
            "file name '{}' must not contain separators",
            name
        )));
    }
    validate_segment(name)
}

/// Build the full data-file path `root/subdir/file`, validating the
/// caller-supplied components first.
pub fn secure_data_path(
    root: impl AsRef<Path>,
    subdir: &str,
    file: &str,
) -> Result<PathBuf, StoreError> {
    validate_subdir(subdir)?;
    validate_file_name(file)?;
    Ok(root.as_ref().join(subdir).join(file))
}
