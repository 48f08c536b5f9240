//! Study-to-country rows

use arrow::datatypes::{DataType, Field, Schema};
use serde::Serialize;

use crate::models::traits::ArrowSchema;

/// One row per (study, country) pair of the country expansion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CountryRow {
    #[serde(rename = "NAME")]
    pub name: Option<String>,
    /// Display form of the study's country list
    #[serde(rename = "COUNTRIESOFSTUDY")]
    pub countries_of_study: Option<String>,
    /// Canonical upper-case country name
    #[serde(rename = "COUNTRY")]
    pub country: String,
    #[serde(rename = "UNITEDSTATES")]
    pub united_states: Option<String>,
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    #[serde(rename = "STUDYSOP")]
    pub study_sop: Option<String>,
    /// Country code, or `None` when the country is not in the code table
    #[serde(rename = "Code")]
    pub code: Option<String>,
}

impl ArrowSchema for CountryRow {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("NAME", DataType::Utf8, true),
            Field::new("COUNTRIESOFSTUDY", DataType::Utf8, true),
            Field::new("COUNTRY", DataType::Utf8, false),
            Field::new("UNITEDSTATES", DataType::Utf8, true),
            Field::new("STATUS", DataType::Utf8, true),
            Field::new("STUDYSOP", DataType::Utf8, true),
            Field::new("Code", DataType::Utf8, true),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_record_batch_keeps_null_codes() {
        let rows = vec![
            CountryRow {
                name: Some("NIS-1".to_string()),
                countries_of_study: Some("Usa".to_string()),
                country: "UNITED STATES".to_string(),
                united_states: Some("Yes".to_string()),
                status: None,
                study_sop: Some("CT24".to_string()),
                code: Some("US".to_string()),
            },
            CountryRow {
                name: Some("NIS-1".to_string()),
                countries_of_study: Some("Atlantis".to_string()),
                country: "ATLANTIS".to_string(),
                united_states: None,
                status: None,
                study_sop: None,
                code: None,
            },
        ];

        let batch = CountryRow::to_record_batch(&rows).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(6).name(), "Code");
        assert_eq!(batch.column(6).null_count(), 1);
    }
}
