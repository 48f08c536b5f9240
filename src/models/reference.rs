//! Raw rows of the reference crosswalk tables

use serde::Deserialize;

use crate::models::traits::SourceTable;

/// Asset crosswalk row: catalog drug name to harmonized drug
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetRow {
    #[serde(rename = "PRIMARYDRUG")]
    pub primary_drug: Option<String>,
    #[serde(rename = "HARMONIZEDPRIMARYDRUG")]
    pub harmonized_primary_drug: Option<String>,
    #[serde(rename = "DRUGPRIORITY")]
    pub drug_priority: Option<String>,
    /// Therapeutic category implied by the drug; optional column
    #[serde(rename = "HARMONIZEDDRUGCATEGORY")]
    pub harmonized_drug_category: Option<String>,
}

impl SourceTable for AssetRow {
    const TABLE_NAME: &'static str = "asset crosswalk";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["PRIMARYDRUG", "HARMONIZEDPRIMARYDRUG", "DRUGPRIORITY"];
}

/// Category crosswalk row
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryRow {
    #[serde(rename = "CATEGORY")]
    pub category: Option<String>,
    #[serde(rename = "HARMONIZEDCATEGORY")]
    pub harmonized_category: Option<String>,
}

impl SourceTable for CategoryRow {
    const TABLE_NAME: &'static str = "category crosswalk";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["CATEGORY", "HARMONIZEDCATEGORY"];
}

/// Status crosswalk row
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusRow {
    pub status_native: Option<String>,
    pub harmonized_status: Option<String>,
    pub harmonized_status_detail: Option<String>,
}

impl SourceTable for StatusRow {
    const TABLE_NAME: &'static str = "status crosswalk";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["status_native", "harmonized_status", "harmonized_status_detail"];
}

/// Country name to code
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CountryCodeRow {
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Code")]
    pub code: Option<String>,
}

impl SourceTable for CountryCodeRow {
    const TABLE_NAME: &'static str = "country codes";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["Country", "Code"];
}
