//! Logging utilities for pipeline progress
//!
//! This module provides consistent log lines for file operations and stages.

pub mod log;

// Re-export commonly used functions for convenience
pub use log::{log_operation_complete, log_operation_start, log_stage, log_warning};
