//! A Rust library for harmonizing study/evidence catalog extracts into a
//! controlled vocabulary for reporting dashboards.
//!
//! A run loads the catalog and its crosswalk tables from a data directory,
//! harmonizes every study, expands the country lists and writes two tables:
//! the normalized records and one row per (study, country).
//!
//! All sources are read as CSV files with a header row. Workbook sources
//! (the grants ledger's "Final" sheet and the country code table) must be
//! exported to CSV before a run; see [`SourceFiles`] for the default names.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod reference;
pub mod utils;
pub mod writer;

use std::path::Path;
use std::time::Instant;

// Core types
pub use config::{HarmonizeConfig, OutputFormat, OutputOptions, SourceFiles};
pub use error::{HarmonizeError, Result};
pub use models::{CatalogEntry, CountryRow, RemainingBudget, StudyRecord};
pub use reference::{ReferenceResolver, ResolvedReferences};
pub use writer::{OutputPaths, OutputWriter};

// Pipeline stages
pub use algorithm::{CountryExpander, Harmonizer, apply_filter, dashboard_pre_filter};

// Arrow types
pub use arrow::record_batch::RecordBatch;

use crate::error::util::{ensure_directory, validate_directory};
use crate::loader::load_table;
use crate::models::traits::ArrowSchema;
use crate::writer::shape_records;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows in the normalized record table
    pub record_rows: usize,
    /// Rows in the country expansion table
    pub country_rows: usize,
    /// Rows removed by the dashboard pre-filter
    pub filtered_rows: usize,
    /// Committed output files
    pub outputs: OutputPaths,
}

/// Harmonize the sources of `data_dir` and write both output tables into
/// `output_dir`.
///
/// Nothing is written unless every source loaded and both tables were
/// produced.
pub fn run(data_dir: &Path, output_dir: &Path, config: &HarmonizeConfig) -> Result<RunSummary> {
    let start = Instant::now();
    validate_directory(data_dir, "source data")?;
    ensure_directory(output_dir, "output")?;

    let resolver = ReferenceResolver::new(data_dir, &config.sources);
    let references = resolver.resolve()?;
    let ledger = resolver.budget_ledger()?;
    let catalog: Vec<CatalogEntry> =
        load_table(&SourceFiles::resolve(data_dir, &config.sources.evidence_catalog))?;

    let records = Harmonizer::new(&references, &ledger).harmonize(catalog);

    // Countries are expanded from every record, filtered or not
    let countries = CountryExpander::new()?.expand_all(&records, &references.country_codes);

    let harmonized_rows = records.len();
    let records = if config.output.apply_pre_filters {
        apply_filter(records, &dashboard_pre_filter())
    } else {
        records
    };
    let filtered_rows = harmonized_rows - records.len();

    let record_batch = shape_records(StudyRecord::to_record_batch(&records)?, &config.output)?;
    let country_batch = CountryRow::to_record_batch(&countries)?;

    let outputs =
        OutputWriter::new(output_dir, config.format).write_tables(&record_batch, &country_batch)?;

    log::info!(
        "Harmonization finished in {:?}: {} records, {} study countries",
        start.elapsed(),
        record_batch.num_rows(),
        country_batch.num_rows()
    );

    Ok(RunSummary {
        record_rows: record_batch.num_rows(),
        country_rows: country_batch.num_rows(),
        filtered_rows,
        outputs,
    })
}
