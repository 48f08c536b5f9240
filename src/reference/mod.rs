//! Reference Resolver
//!
//! Prepares the static crosswalk tables into immutable lookups. They are
//! built once per run and passed by shared reference into the stages that
//! need them.

pub mod asset;
pub mod budget;
pub mod country_codes;
pub mod lookup;
pub mod status;

use std::path::Path;

use crate::config::SourceFiles;
use crate::error::Result;
use crate::loader::load_table;
use crate::models::budget::BudgetRow;
use crate::models::reference::{AssetRow, CategoryRow, CountryCodeRow, StatusRow};

pub use asset::{AssetEntry, AssetMapping, CategoryMapping, asset_mapping, category_mapping};
pub use budget::{BudgetLedger, budget_ledger, grant_key};
pub use country_codes::{CountryCodeMapping, country_code_mapping};
pub use lookup::LookupTable;
pub use status::{HarmonizedStatus, StatusMapping};

/// All reference mappings of a run
#[derive(Debug, Clone)]
pub struct ResolvedReferences {
    pub assets: AssetMapping,
    pub categories: CategoryMapping,
    pub statuses: StatusMapping,
    pub country_codes: CountryCodeMapping,
}

impl ResolvedReferences {
    /// Build every mapping from already-decoded reference rows
    #[must_use]
    pub fn from_rows(
        assets: &[AssetRow],
        categories: &[CategoryRow],
        statuses: &[StatusRow],
        country_codes: &[CountryCodeRow],
    ) -> Self {
        let resolved = Self {
            assets: asset_mapping(assets),
            categories: category_mapping(categories),
            statuses: StatusMapping::from_rows(statuses),
            country_codes: country_code_mapping(country_codes),
        };
        resolved.log_summary();
        resolved
    }

    /// Log key counts and dropped rows of every mapping
    pub fn log_summary(&self) {
        self.assets.log_summary();
        self.categories.log_summary();
        self.statuses.table().log_summary();
        self.country_codes.log_summary();
    }
}

/// Loads the reference tables of a data directory
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    data_dir: &'a Path,
    sources: &'a SourceFiles,
}

impl<'a> ReferenceResolver<'a> {
    /// Create a resolver for a data directory
    #[must_use]
    pub fn new(data_dir: &'a Path, sources: &'a SourceFiles) -> Self {
        Self { data_dir, sources }
    }

    /// Load and resolve the asset, category, status and country code tables
    pub fn resolve(&self) -> Result<ResolvedReferences> {
        let assets: Vec<AssetRow> = load_table(&self.path(&self.sources.asset_harmonization))?;
        let categories: Vec<CategoryRow> =
            load_table(&self.path(&self.sources.category_harmonization))?;
        let statuses: Vec<StatusRow> = load_table(&self.path(&self.sources.status_harmonization))?;
        let country_codes: Vec<CountryCodeRow> =
            load_table(&self.path(&self.sources.country_codes))?;

        Ok(ResolvedReferences::from_rows(
            &assets,
            &categories,
            &statuses,
            &country_codes,
        ))
    }

    /// Load the grants ledger and derive each entry's remaining budget
    pub fn budget_ledger(&self) -> Result<BudgetLedger> {
        let rows: Vec<BudgetRow> = load_table(&self.path(&self.sources.budget_ledger))?;
        Ok(budget_ledger(&rows))
    }

    fn path(&self, file_name: &str) -> std::path::PathBuf {
        SourceFiles::resolve(self.data_dir, file_name)
    }
}
