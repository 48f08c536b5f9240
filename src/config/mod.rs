//! Configuration for a harmonization run.
//!
//! Everything that changes the shape of a run is a field of
//! [`HarmonizeConfig`], which is passed explicitly to the entry point.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_to_string;
use crate::error::{HarmonizeError, Result};

/// File names of the source extracts inside the data directory.
///
/// Every source is read as CSV. Workbook sources must be exported first:
/// the grants ledger from the "Final" sheet, the country codes from their
/// single sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    /// Study/evidence catalog
    pub evidence_catalog: String,
    /// Asset (primary drug) crosswalk
    pub asset_harmonization: String,
    /// Therapeutic category crosswalk
    pub category_harmonization: String,
    /// Status crosswalk
    pub status_harmonization: String,
    /// Grants budget ledger, a CSV export of the workbook's "Final" sheet
    pub budget_ledger: String,
    /// Country name to country code reference, a CSV export of the workbook
    pub country_codes: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            evidence_catalog: "EvidenceCatalog.csv".to_string(),
            asset_harmonization: "AssetHarmonization.csv".to_string(),
            category_harmonization: "CategoryHarmonization.csv".to_string(),
            status_harmonization: "StatusHarmonization.csv".to_string(),
            budget_ledger: "Grants Budgets and Payments.csv".to_string(),
            country_codes: "country_codes.csv".to_string(),
        }
    }
}

impl SourceFiles {
    /// Resolve a source file name against the data directory
    #[must_use]
    pub fn resolve(data_dir: &Path, file_name: &str) -> PathBuf {
        data_dir.join(file_name)
    }
}

/// Shaping applied to the normalized record table on output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Restrict output to the fixed display column list
    pub subset_columns: bool,
    /// Rename display columns to human-readable headers
    pub rename_columns: bool,
    /// Drop rows matching the dashboard exclusion list
    pub apply_pre_filters: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            subset_columns: true,
            rename_columns: true,
            apply_pre_filters: true,
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma separated values with a header row
    #[default]
    Csv,
    /// Apache Parquet
    Parquet,
}

impl OutputFormat {
    /// File extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Configuration for a harmonization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizeConfig {
    /// Source file names
    pub sources: SourceFiles,
    /// Record table shaping
    pub output: OutputOptions,
    /// Output file format
    pub format: OutputFormat,
}

impl HarmonizeConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "harmonizer configuration")?;
        Self::from_json_str(&content)
            .map_err(|e| e.context(format!("while reading {}", path.display())))
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| HarmonizeError::Config(e.to_string()))
    }
}
