//! Error handling for the harmonization pipeline.
//!
//! Only structural problems are errors: unreadable sources, missing required
//! columns, malformed CSV and invalid configuration. Messy values inside a
//! readable table are normalized by the pipeline and never surface here.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the harmonization pipeline
#[derive(Debug, thiserror::Error)]
pub enum HarmonizeError {
    /// Error opening, reading or writing a file
    #[error("IO error{}: {message}", display_path(.path))]
    Io {
        /// What was being attempted
        message: String,
        /// The file or directory involved, if known
        path: Option<PathBuf>,
        /// Underlying IO error, if any
        #[source]
        source: Option<io::Error>,
    },

    /// Error reading or writing Arrow data (CSV decoding, batch assembly)
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A CSV source could not be parsed
    #[error("Malformed CSV at {}: {source}", .path.display())]
    MalformedCsv {
        /// The offending file
        path: PathBuf,
        /// Underlying Arrow CSV error
        #[source]
        source: ArrowError,
    },

    /// Error writing Parquet output
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting between typed rows and record batches
    #[error("Conversion error: {0}")]
    Conversion(#[from] serde_arrow::Error),

    /// A source table lacks a column the pipeline addresses by name
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn {
        /// Logical name of the table
        table: String,
        /// Name of the missing column
        column: String,
    },

    /// A replacement pattern failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl HarmonizeError {
    /// Create an IO error without an underlying source
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an IO error wrapping an underlying `io::Error`
    pub fn io_error_with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source: Some(source),
        }
    }

    /// Attach a path to an IO error. Other variants are returned unchanged.
    #[must_use]
    pub fn with_path(self, new_path: impl AsRef<Path>) -> Self {
        match self {
            Self::Io {
                message, source, ..
            } => Self::Io {
                message,
                path: Some(new_path.as_ref().to_path_buf()),
                source,
            },
            other => other,
        }
    }

    /// Prefix additional context onto an IO or configuration error message
    #[must_use]
    pub fn context(self, ctx: impl AsRef<str>) -> Self {
        match self {
            Self::Io {
                message,
                path,
                source,
            } => Self::Io {
                message: format!("{message} ({})", ctx.as_ref()),
                path,
                source,
            },
            Self::Config(message) => Self::Config(format!("{message} ({})", ctx.as_ref())),
            other => other,
        }
    }

    /// Create a malformed CSV error for a source file
    pub fn malformed_csv(path: &Path, source: ArrowError) -> Self {
        Self::MalformedCsv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a missing column error
    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<io::Error> for HarmonizeError {
    fn from(error: io::Error) -> Self {
        Self::io_error_with_source("IO operation failed", error)
    }
}

/// Result type for harmonization operations
pub type Result<T> = std::result::Result<T, HarmonizeError>;
