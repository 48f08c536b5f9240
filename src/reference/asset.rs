//! Asset and category crosswalks

use super::lookup::LookupTable;
use crate::models::reference::{AssetRow, CategoryRow};
use crate::utils::text::{optional_key, reference_key};

/// Harmonized drug attributes for one catalog drug name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetEntry {
    pub harmonized_primary_drug: Option<String>,
    pub drug_priority: Option<String>,
    pub harmonized_drug_category: Option<String>,
}

/// Catalog drug name (trimmed, upper-cased) to every matching crosswalk entry
pub type AssetMapping = LookupTable<AssetEntry>;

/// Catalog category (trimmed, upper-cased) to every matching harmonized category
pub type CategoryMapping = LookupTable<Option<String>>;

/// Build the asset mapping. A drug listed more than once maps to all its rows.
#[must_use]
pub fn asset_mapping(rows: &[AssetRow]) -> AssetMapping {
    let mut table = LookupTable::new("asset");
    for row in rows {
        match optional_key(row.primary_drug.as_deref(), reference_key) {
            Some(key) => table.insert(
                key,
                AssetEntry {
                    harmonized_primary_drug: row.harmonized_primary_drug.clone(),
                    drug_priority: row.drug_priority.clone(),
                    harmonized_drug_category: row.harmonized_drug_category.clone(),
                },
            ),
            None => table.record_dropped(),
        }
    }
    table
}

/// Build the category mapping
#[must_use]
pub fn category_mapping(rows: &[CategoryRow]) -> CategoryMapping {
    let mut table = LookupTable::new("category");
    for row in rows {
        match optional_key(row.category.as_deref(), reference_key) {
            Some(key) => table.insert(key, row.harmonized_category.clone()),
            None => table.record_dropped(),
        }
    }
    table
}
