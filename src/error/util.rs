//! Utility functions for error handling
//!
//! Filesystem helpers that turn bare `io::Error`s into path-carrying
//! [`HarmonizeError`]s, so a failed run names the source it could not use.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{HarmonizeError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(HarmonizeError::io_error("File not found")
            .with_path(path)
            .context(format!("Needed for: {purpose}")));
    }

    if !path.is_file() {
        return Err(HarmonizeError::io_error("Path is not a file")
            .with_path(path)
            .context(format!("Expected a file for: {purpose}")));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        HarmonizeError::io_error_with_source(context, e).with_path(path)
    })
}

/// Check that a directory exists and is readable
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(HarmonizeError::io_error("Directory not found")
            .with_path(path)
            .context(format!("Needed for: {purpose}")));
    }

    if !path.is_dir() {
        return Err(HarmonizeError::io_error("Path is not a directory")
            .with_path(path)
            .context(format!("Expected a directory for: {purpose}")));
    }

    match fs::read_dir(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check directory permissions".to_string()
                }
                _ => format!("Failed to access directory for: {purpose}"),
            };
            Err(HarmonizeError::io_error_with_source(context, e).with_path(path))
        }
    }
}

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        HarmonizeError::io_error_with_source(format!("Failed to create directory for: {purpose}"), e)
            .with_path(path)
    })
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    match io::Read::read_to_string(&mut file, &mut content) {
        Ok(_) => Ok(content),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::InvalidData => {
                    "File contains invalid UTF-8 data - cannot read as text".to_string()
                }
                _ => format!("Failed to read file content for: {purpose}"),
            };
            Err(HarmonizeError::io_error_with_source(context, e).with_path(path))
        }
    }
}

/// Move a staged file into its final location
pub fn commit_staged_file(staged: &Path, target: &Path) -> Result<()> {
    fs::rename(staged, target).map_err(|e| {
        HarmonizeError::io_error_with_source("Failed to move staged output into place", e)
            .with_path(target)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_safe_open_missing_file() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("AssetHarmonization.csv");

        let err = safe_open_file(&missing, "asset crosswalk").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("File not found"));
        assert!(message.contains("asset crosswalk"));
    }

    #[test]
    fn test_validate_directory_rejects_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("not_a_dir.csv");
        fs::write(&file, "a,b\n").unwrap();

        assert!(validate_directory(tmp.path(), "data").is_ok());
        assert!(validate_directory(&file, "data").is_err());
    }

    #[test]
    fn test_commit_staged_file() {
        let tmp = tempdir().unwrap();
        let staged = tmp.path().join("nis.csv.staged");
        let target = tmp.path().join("nis.csv");
        fs::write(&staged, "NAME\n").unwrap();

        commit_staged_file(&staged, &target).unwrap();
        assert!(!staged.exists());
        assert_eq!(safe_read_to_string(&target, "output").unwrap(), "NAME\n");
    }
}
