//! Logging utilities
//!
//! This module provides standardized logging functions for pipeline stages.

use std::path::Path;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file that was operated on
/// * `items` - Number of rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} rows: {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        );
    } else {
        log::info!(
            "Successfully {} {} rows: {}",
            operation,
            items,
            path.display()
        );
    }
}

/// Log a pipeline stage transition with row counts before and after
///
/// # Arguments
/// * `stage` - Name of the stage
/// * `rows_in` - Rows entering the stage
/// * `rows_out` - Rows leaving the stage
pub fn log_stage(stage: &str, rows_in: usize, rows_out: usize) {
    if rows_in == rows_out {
        log::info!("{stage}: {rows_out} rows");
    } else {
        log::info!("{stage}: {rows_in} rows in, {rows_out} rows out");
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
