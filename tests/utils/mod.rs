use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use evidence_harmonizer::loader::read_csv;
use evidence_harmonizer::{HarmonizeConfig, Result, RunSummary, run};
use tempfile::TempDir;

pub const CATALOG_HEADER: &str = "NAME,TITLE,STUDYTYPE,STUDYSUBTYPE,STUDYSOP,\
PRIMARYDATACOLLECTION,SECONDARYDATACOLLECTION,PASS,PMS,CATEGORY,INDICATION,\
PRIMARYDRUG,STATUS,COUNTRIESOFSTUDY,UNITEDSTATES,INTERNATIONALPRIORITY,\
ANCHORMARKET,EXECUTIONGROUP,SPONSORINGDIVISION";

/// Three studies: an observational registry with a grant, an interventional
/// phase 1 trial and a research collaboration without a grant
pub const CATALOG_ROWS: &[&str] = &[
    "NIS-001,Registry of outcomes,Non-Interventional,,,,,NO,N,CV,Atrial Fibrillation,Eliquis,Approved,\"USA|Korea, Republic Of\",Yes,Yes,No,Medical,Medical",
    "NIS-002,A Phase 1 dose study,Interventional,,,,,,,ONC,Melanoma,,Closed,Unknown,Yes,No,No,GMA,Medical",
    "NIS-003,Phase 1 follow-up,Research Collaboration,,,,,,,ONC,Melanoma,,approved,Unknown,No,No,No,,Medical",
];

pub const ASSETS: &str = "PRIMARYDRUG,HARMONIZEDPRIMARYDRUG,DRUGPRIORITY,HARMONIZEDDRUGCATEGORY\n\
ELIQUIS,Eliquis,Priority,Internal Medicine\n";

pub const CATEGORIES: &str = "CATEGORY,HARMONIZEDCATEGORY\nCV,Cardiovascular\nONC,Oncology\n";

pub const STATUSES: &str = "status_native,harmonized_status,harmonized_status_detail\n\
Approved,Ongoing,Approved\n";

pub const BUDGET: &str = "GRANT_ID,APPROVED_AMOUNT,TOTAL_PAID\nNIS-001,100,40\n";

pub const COUNTRY_CODES: &str = "Country,Code\nUnited States,US\nKorea,KR\n";

/// A data directory populated with the default source file names
pub struct Fixture {
    pub data: TempDir,
    pub output: TempDir,
}

impl Fixture {
    /// Write every source with the default contents
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(CATALOG_HEADER, CATALOG_ROWS)
    }

    /// Write every source, using the given catalog header and rows
    #[must_use]
    pub fn with_catalog(header: &str, rows: &[&str]) -> Self {
        let fixture = Self {
            data: TempDir::new().unwrap(),
            output: TempDir::new().unwrap(),
        };
        let mut catalog = format!("{header}\n");
        for row in rows {
            catalog.push_str(row);
            catalog.push('\n');
        }

        let sources = HarmonizeConfig::default().sources;
        fixture.write(&sources.evidence_catalog, &catalog);
        fixture.write(&sources.asset_harmonization, ASSETS);
        fixture.write(&sources.category_harmonization, CATEGORIES);
        fixture.write(&sources.status_harmonization, STATUSES);
        fixture.write(&sources.budget_ledger, BUDGET);
        fixture.write(&sources.country_codes, COUNTRY_CODES);
        fixture
    }

    /// Overwrite one source file
    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.data.path().join(name), content).unwrap();
    }

    /// Run the pipeline over this fixture
    pub fn run(&self, config: &HarmonizeConfig) -> Result<RunSummary> {
        run(self.data.path(), self.output.path(), config)
    }

    #[must_use]
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output.path().join(name)
    }
}

/// Read a written CSV table back as text columns
#[must_use]
pub fn read_output(path: &Path) -> RecordBatch {
    read_csv(path, "test output").unwrap()
}

/// Values of a text column, by name
#[must_use]
pub fn column(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let index = batch
        .schema()
        .index_of(name)
        .unwrap_or_else(|_| panic!("column {name} not in output"));
    let values = batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    (0..values.len())
        .map(|i| (!values.is_null(i)).then(|| values.value(i).to_string()))
        .collect()
}

/// Convenience for comparing against literal expectations
#[must_use]
pub fn strings(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}
