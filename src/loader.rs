//! CSV source loading
//!
//! Every source is read as text: the header is sniffed, each column is
//! declared nullable `Utf8`, and empty cells become nulls. Typed rows are
//! then decoded from the record batch with `serde_arrow`.

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::util::safe_open_file;
use crate::error::{HarmonizeError, Result};
use crate::models::traits::SourceTable;
use crate::utils::logging::{log_operation_complete, log_operation_start};

const BATCH_SIZE: usize = 8_192;

/// Clean a header cell: strip a UTF-8 byte order mark and surrounding whitespace
fn clean_column_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// Infer the column names of a CSV file and type every column as text
fn text_schema(path: &Path, file: &mut std::fs::File) -> Result<SchemaRef> {
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut *file, Some(0))
        .map_err(|e| HarmonizeError::malformed_csv(path, e))?;
    file.rewind()
        .map_err(|e| HarmonizeError::io_error_with_source("Failed to rewind file", e).with_path(path))?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(clean_column_name(f.name()), DataType::Utf8, true))
        .collect();
    Ok(Arc::new(Schema::new(fields)))
}

/// Read a CSV file into a single all-text record batch
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `purpose` - What the file is needed for (for error context)
pub fn read_csv(path: &Path, purpose: &str) -> Result<RecordBatch> {
    let mut file = safe_open_file(path, purpose)?;
    let schema = text_schema(path, &mut file)?;

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(file)
        .map_err(|e| HarmonizeError::malformed_csv(path, e))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| HarmonizeError::malformed_csv(path, e))?;

    Ok(concat_batches(&schema, &batches)?)
}

/// Check that a batch carries every column a table requires
pub fn validate_required_columns(
    batch: &RecordBatch,
    table: &str,
    required: &[&str],
) -> Result<()> {
    let schema = batch.schema();
    match required
        .iter()
        .find(|column| schema.index_of(column).is_err())
    {
        Some(column) => Err(HarmonizeError::missing_column(table, column)),
        None => Ok(()),
    }
}

/// Load a source table from a CSV file into typed rows
pub fn load_table<T: SourceTable>(path: &Path) -> Result<Vec<T>> {
    let start = Instant::now();
    log_operation_start(&format!("Loading {} from", T::TABLE_NAME), path);

    let batch = read_csv(path, T::TABLE_NAME)?;
    validate_required_columns(&batch, T::TABLE_NAME, T::REQUIRED_COLUMNS)?;
    let rows = T::from_record_batch(&batch)?;

    log_operation_complete("loaded", path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}
