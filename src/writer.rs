//! Output shaping and writing
//!
//! Record batches are optionally reduced to the display columns and renamed
//! to dashboard headers, then written as CSV or Parquet. Both output tables
//! are written to staged files first and only renamed into place once both
//! were written, so a failed run leaves no partial output behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::config::{OutputFormat, OutputOptions};
use crate::error::util::commit_staged_file;
use crate::error::{HarmonizeError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Columns of the display table, in order
pub const DISPLAY_COLUMNS: &[&str] = &[
    "NAME",
    "TITLE",
    "STUDYTYPE",
    "STUDYSOP",
    "STUDYSUBTYPE",
    "PASS",
    "PMS",
    "HARMONIZEDCATEGORY",
    "INDICATION",
    "HARMONIZEDPRIMARYDRUG",
    "DRUGPRIORITY",
    "STATUS",
    "STATUSDETAIL",
    "COUNTRIESOFSTUDY",
    "UNITEDSTATES",
    "INTERNATIONALPRIORITY",
    "ANCHORMARKET",
    "EXECUTIONGROUP",
    "SPONSORINGDIVISION",
    "APPROVED_AMOUNT",
    "TOTAL_PAID",
    "REMAINING_BUDGET",
];

/// Dashboard headers of the display columns
pub const DISPLAY_HEADERS: &[(&str, &str)] = &[
    ("NAME", "ID"),
    ("STUDYSOP", "SOP"),
    ("TITLE", "Title"),
    ("STUDYTYPE", "Study Type"),
    ("STUDYSUBTYPE", "Study Subtype"),
    ("PASS", "PASS"),
    ("PMS", "Post Marketing Surveillance"),
    ("HARMONIZEDCATEGORY", "Category"),
    ("INDICATION", "Indication"),
    ("HARMONIZEDPRIMARYDRUG", "Primary Drug"),
    ("DRUGPRIORITY", "Asset Priority"),
    ("STATUS", "Status"),
    ("STATUSDETAIL", "Status Detail"),
    ("COUNTRIESOFSTUDY", "Study Country(s)"),
    ("UNITEDSTATES", "Study Conducted in United States"),
    (
        "INTERNATIONALPRIORITY",
        "Study Conducted in International Priority Market",
    ),
    ("ANCHORMARKET", "Study Conducted in Anchor Market"),
    ("EXECUTIONGROUP", "Group Operationalizing"),
    ("SPONSORINGDIVISION", "Sponsoring Division"),
    ("APPROVED_AMOUNT", "Total"),
    ("TOTAL_PAID", "Paid"),
    ("REMAINING_BUDGET", "Remaining Budget"),
];

/// File stem of the normalized record table
pub const RECORDS_STEM: &str = "nis";

/// File stem of the country expansion table
pub const COUNTRIES_STEM: &str = "study_countries";

/// Keep only the display columns, in display order
pub fn subset_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let indices = DISPLAY_COLUMNS
        .iter()
        .map(|column| {
            schema
                .index_of(column)
                .map_err(|_| HarmonizeError::missing_column("normalized records", column))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(batch.project(&indices)?)
}

/// Rename display columns to dashboard headers. Other columns keep their name.
pub fn rename_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|field| {
            let header = DISPLAY_HEADERS
                .iter()
                .find(|(column, _)| *column == field.name().as_str())
                .map_or(field.name().as_str(), |&(_, header)| header);
            field.as_ref().clone().with_name(header)
        })
        .collect();
    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        batch.columns().to_vec(),
    )?)
}

/// Apply the configured subset and rename to the record table
pub fn shape_records(batch: RecordBatch, options: &OutputOptions) -> Result<RecordBatch> {
    let batch = if options.subset_columns {
        subset_columns(&batch)?
    } else {
        batch
    };
    if options.rename_columns {
        rename_columns(&batch)
    } else {
        Ok(batch)
    }
}

/// Write a batch to a file in the given format
pub fn write_batch(batch: &RecordBatch, path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        HarmonizeError::io_error_with_source("Failed to create output file", e).with_path(path)
    })?;
    let sink = BufWriter::new(file);

    match format {
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().with_header(true).build(sink);
            writer.write(batch)?;
            flush(writer.into_inner(), path)?;
        }
        OutputFormat::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            let mut writer = ArrowWriter::try_new(sink, batch.schema(), Some(props))?;
            writer.write(batch)?;
            flush(writer.into_inner()?, path)?;
        }
    }
    Ok(())
}

fn flush(mut sink: BufWriter<File>, path: &Path) -> Result<()> {
    sink.flush().map_err(|e| {
        HarmonizeError::io_error_with_source("Failed to flush output file", e).with_path(path)
    })
}

/// Paths of the committed output tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub records: PathBuf,
    pub countries: PathBuf,
}

/// Writes the two output tables of a run into a directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a writer for an output directory
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Final path of an output table
    #[must_use]
    pub fn target_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}.{}", self.format.extension()))
    }

    fn staged_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}.{}.tmp", self.format.extension()))
    }

    /// Write both tables to staged files, then move them into place
    pub fn write_tables(&self, records: &RecordBatch, countries: &RecordBatch) -> Result<OutputPaths> {
        let start = Instant::now();
        let tables = [(RECORDS_STEM, records), (COUNTRIES_STEM, countries)];

        let mut staged = Vec::with_capacity(tables.len());
        for (stem, batch) in tables {
            let path = self.staged_path(stem);
            log_operation_start("Writing", &path);
            if let Err(e) = write_batch(batch, &path, self.format) {
                staged.push(path);
                discard_staged(&staged);
                return Err(e);
            }
            staged.push(path);
        }

        let targets: Vec<PathBuf> = tables.iter().map(|(stem, _)| self.target_path(stem)).collect();
        commit_all(&staged, &targets)?;
        for ((_, batch), target) in tables.iter().zip(&targets) {
            log_operation_complete("wrote", target, batch.num_rows(), Some(start.elapsed()));
        }

        Ok(OutputPaths {
            records: self.target_path(RECORDS_STEM),
            countries: self.target_path(COUNTRIES_STEM),
        })
    }
}

/// Move every staged file onto its target, or none of them.
///
/// Existing target files are moved aside first. If any step fails, the
/// committed targets are removed, the previous files are restored and
/// the remaining staged files are discarded.
fn commit_all(staged: &[PathBuf], targets: &[PathBuf]) -> Result<()> {
    let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
    for target in targets.iter().filter(|target| target.is_file()) {
        let backup = backup_path(target);
        if let Err(e) = commit_staged_file(target, &backup) {
            rollback(&[], &backups, staged);
            return Err(e);
        }
        backups.push((backup, target.clone()));
    }

    let mut committed: Vec<&Path> = Vec::with_capacity(targets.len());
    for (staged_path, target) in staged.iter().zip(targets) {
        if let Err(e) = commit_staged_file(staged_path, target) {
            rollback(&committed, &backups, staged);
            return Err(e);
        }
        committed.push(target);
    }

    let backup_files: Vec<PathBuf> = backups.into_iter().map(|(backup, _)| backup).collect();
    discard_staged(&backup_files);
    Ok(())
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Undo a partial commit: drop committed targets, put previous files back
/// and remove staged files that were not moved
fn rollback(committed: &[&Path], backups: &[(PathBuf, PathBuf)], staged: &[PathBuf]) {
    for target in committed {
        if let Err(e) = fs::remove_file(target) {
            log_warning(&format!("Failed to remove partially committed output ({e})"), Some(*target));
        }
    }
    for (backup, target) in backups {
        if let Err(e) = fs::rename(backup, target) {
            log_warning(&format!("Failed to restore previous output ({e})"), Some(target.as_path()));
        }
    }
    discard_staged(staged);
}

/// Best-effort removal of staged or backup files
fn discard_staged(paths: &[PathBuf]) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                log_warning(&format!("Failed to remove staged file ({e})"), Some(path.as_path()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::study::StudyRecord;
    use crate::models::traits::ArrowSchema;
    use tempfile::TempDir;

    fn batch() -> RecordBatch {
        let records = vec![StudyRecord {
            name: Some("NIS-1".to_string()),
            study_sop: Some("CT24".to_string()),
            approved_amount: Some(100.0),
            ..StudyRecord::default()
        }];
        StudyRecord::to_record_batch(&records).unwrap()
    }

    #[test]
    fn test_subset_keeps_display_order() {
        let shaped = subset_columns(&batch()).unwrap();
        let names: Vec<_> = shaped
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, DISPLAY_COLUMNS);
    }

    #[test]
    fn test_rename_without_subset_keeps_unlisted_columns() {
        let options = OutputOptions {
            subset_columns: false,
            rename_columns: true,
            apply_pre_filters: false,
        };
        let shaped = shape_records(batch(), &options).unwrap();
        let schema = shaped.schema();
        assert_eq!(schema.field(0).name(), "ID");
        assert!(schema.index_of("PRIMARYDATACOLLECTION").is_ok());
        assert!(schema.index_of("Remaining Budget").is_ok());
        assert_eq!(shaped.num_columns(), StudyRecord::schema().fields().len());
    }

    #[test]
    fn test_write_tables_commits_both_files() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Csv);
        let paths = writer.write_tables(&batch(), &batch()).unwrap();

        assert!(paths.records.ends_with("nis.csv"));
        assert!(paths.countries.ends_with("study_countries.csv"));
        let content = fs::read_to_string(&paths.records).unwrap();
        assert!(content.starts_with("NAME,TITLE"));
        assert!(content.contains("NIS-1"));

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_parquet() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Parquet);
        let paths = writer.write_tables(&batch(), &batch()).unwrap();
        assert!(paths.records.ends_with("nis.parquet"));
        assert!(fs::metadata(&paths.records).unwrap().len() > 0);
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("missing"), OutputFormat::Csv);
        assert!(writer.write_tables(&batch(), &batch()).is_err());
        assert!(!writer.target_path(RECORDS_STEM).exists());
    }

    fn leftovers(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == "tmp" || ext == "bak")
            })
            .collect()
    }

    #[test]
    fn test_failed_commit_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Csv);
        let blocker = writer.target_path(COUNTRIES_STEM);
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        assert!(writer.write_tables(&batch(), &batch()).is_err());
        assert!(!writer.target_path(RECORDS_STEM).exists());
        assert!(leftovers(dir.path()).is_empty());
        assert!(blocker.join("keep").exists());
    }

    #[test]
    fn test_failed_commit_restores_previous_output() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Csv);
        let records = writer.target_path(RECORDS_STEM);
        fs::write(&records, "previous run\n").unwrap();
        let blocker = writer.target_path(COUNTRIES_STEM);
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        assert!(writer.write_tables(&batch(), &batch()).is_err());
        assert_eq!(fs::read_to_string(&records).unwrap(), "previous run\n");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_rewrite_replaces_previous_output() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path(), OutputFormat::Csv);
        fs::write(writer.target_path(RECORDS_STEM), "previous run\n").unwrap();

        let paths = writer.write_tables(&batch(), &batch()).unwrap();
        assert!(fs::read_to_string(&paths.records).unwrap().contains("NIS-1"));
        assert!(leftovers(dir.path()).is_empty());
    }
}
