//! Trait definitions for row models
//!
//! Source rows are decoded from Arrow record batches and output rows are
//! encoded back into them; both directions go through `serde_arrow`.

use std::sync::Arc;

use arrow::datatypes::{FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// A row type read from a named source table.
///
/// `SourceTable` ties a row model to the columns the pipeline addresses by
/// name. The loader checks [`SourceTable::REQUIRED_COLUMNS`] before decoding,
/// so a missing column fails the run instead of silently producing nulls.
pub trait SourceTable: DeserializeOwned + Sized {
    /// Human-readable table name used in logs and errors
    const TABLE_NAME: &'static str;

    /// Columns that must be present in the source file
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Convert a `RecordBatch` to a vector of rows
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }
}

/// A row type that can be written as an Arrow `RecordBatch`.
///
/// The schema is declared explicitly so output column order and types stay
/// fixed regardless of which values happen to be null in a run.
pub trait ArrowSchema: Serialize + Sized {
    /// Get the Arrow schema for this model
    fn schema() -> Schema;

    /// Convert a slice of rows to a `RecordBatch`
    fn to_record_batch(models: &[Self]) -> Result<RecordBatch> {
        let fields: Vec<FieldRef> = Self::schema().fields().iter().map(Arc::clone).collect();
        Ok(serde_arrow::to_record_batch(&fields, &models)?)
    }
}
