//! Study catalog rows
//!
//! [`CatalogEntry`] is one raw row of the evidence catalog as exported.
//! [`StudyRecord`] is the harmonized row the pipeline emits: the catalog
//! fields plus everything joined or derived along the way.

use arrow::datatypes::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

use crate::algorithm::rules::RuleTarget;
use crate::models::budget::{BudgetRecord, RemainingBudget};
use crate::models::traits::{ArrowSchema, SourceTable};

/// Raw row of the study/evidence catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(rename = "NAME")]
    pub name: Option<String>,
    #[serde(rename = "TITLE")]
    pub title: Option<String>,
    #[serde(rename = "STUDYTYPE")]
    pub study_type: Option<String>,
    #[serde(rename = "STUDYSUBTYPE")]
    pub study_subtype: Option<String>,
    #[serde(rename = "STUDYSOP")]
    pub study_sop: Option<String>,
    #[serde(rename = "PRIMARYDATACOLLECTION")]
    pub primary_data_collection: Option<String>,
    #[serde(rename = "SECONDARYDATACOLLECTION")]
    pub secondary_data_collection: Option<String>,
    #[serde(rename = "PASS")]
    pub pass: Option<String>,
    #[serde(rename = "PMS")]
    pub pms: Option<String>,
    #[serde(rename = "CATEGORY")]
    pub category: Option<String>,
    #[serde(rename = "INDICATION")]
    pub indication: Option<String>,
    #[serde(rename = "PRIMARYDRUG")]
    pub primary_drug: Option<String>,
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    #[serde(rename = "COUNTRIESOFSTUDY")]
    pub countries_of_study: Option<String>,
    #[serde(rename = "UNITEDSTATES")]
    pub united_states: Option<String>,
    #[serde(rename = "INTERNATIONALPRIORITY")]
    pub international_priority: Option<String>,
    #[serde(rename = "ANCHORMARKET")]
    pub anchor_market: Option<String>,
    #[serde(rename = "EXECUTIONGROUP")]
    pub execution_group: Option<String>,
    #[serde(rename = "SPONSORINGDIVISION")]
    pub sponsoring_division: Option<String>,
}

impl SourceTable for CatalogEntry {
    const TABLE_NAME: &'static str = "evidence catalog";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "NAME",
        "TITLE",
        "STUDYTYPE",
        "STUDYSUBTYPE",
        "STUDYSOP",
        "PRIMARYDATACOLLECTION",
        "SECONDARYDATACOLLECTION",
        "PASS",
        "PMS",
        "CATEGORY",
        "INDICATION",
        "PRIMARYDRUG",
        "STATUS",
        "COUNTRIESOFSTUDY",
        "UNITEDSTATES",
        "INTERNATIONALPRIORITY",
        "ANCHORMARKET",
        "EXECUTIONGROUP",
        "SPONSORINGDIVISION",
    ];
}

/// Harmonized study record
///
/// Field order matches [`StudyRecord::schema`], which is also the column
/// order of the full (non-subset) output table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudyRecord {
    #[serde(rename = "NAME")]
    pub name: Option<String>,
    #[serde(rename = "TITLE")]
    pub title: Option<String>,
    #[serde(rename = "STUDYTYPE")]
    pub study_type: Option<String>,
    #[serde(rename = "STUDYSUBTYPE")]
    pub study_subtype: Option<String>,
    /// Operating-procedure classification code
    #[serde(rename = "STUDYSOP")]
    pub study_sop: Option<String>,
    #[serde(rename = "PRIMARYDATACOLLECTION")]
    pub primary_data_collection: Option<String>,
    #[serde(rename = "SECONDARYDATACOLLECTION")]
    pub secondary_data_collection: Option<String>,
    #[serde(rename = "PASS")]
    pub pass: Option<String>,
    #[serde(rename = "PMS")]
    pub pms: Option<String>,
    #[serde(rename = "CATEGORY")]
    pub category: Option<String>,
    #[serde(rename = "HARMONIZEDCATEGORY")]
    pub harmonized_category: Option<String>,
    #[serde(rename = "INDICATION")]
    pub indication: Option<String>,
    #[serde(rename = "PRIMARYDRUG")]
    pub primary_drug: Option<String>,
    #[serde(rename = "HARMONIZEDPRIMARYDRUG")]
    pub harmonized_primary_drug: Option<String>,
    /// Category implied by the asset crosswalk; wins over the category crosswalk
    #[serde(rename = "HARMONIZEDDRUGCATEGORY")]
    pub harmonized_drug_category: Option<String>,
    #[serde(rename = "DRUGPRIORITY")]
    pub drug_priority: Option<String>,
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    #[serde(rename = "STATUSDETAIL")]
    pub status_detail: Option<String>,
    #[serde(rename = "COUNTRIESOFSTUDY")]
    pub countries_of_study: Option<String>,
    #[serde(rename = "UNITEDSTATES")]
    pub united_states: Option<String>,
    #[serde(rename = "INTERNATIONALPRIORITY")]
    pub international_priority: Option<String>,
    #[serde(rename = "ANCHORMARKET")]
    pub anchor_market: Option<String>,
    #[serde(rename = "EXECUTIONGROUP")]
    pub execution_group: Option<String>,
    #[serde(rename = "SPONSORINGDIVISION")]
    pub sponsoring_division: Option<String>,
    #[serde(rename = "APPROVED_AMOUNT")]
    pub approved_amount: Option<f64>,
    #[serde(rename = "TOTAL_PAID")]
    pub total_paid: Option<f64>,
    #[serde(rename = "REMAINING_BUDGET")]
    pub remaining_budget: RemainingBudget,
}

impl From<CatalogEntry> for StudyRecord {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name,
            title: entry.title,
            study_type: entry.study_type,
            study_subtype: entry.study_subtype,
            study_sop: entry.study_sop,
            primary_data_collection: entry.primary_data_collection,
            secondary_data_collection: entry.secondary_data_collection,
            pass: entry.pass,
            pms: entry.pms,
            category: entry.category,
            indication: entry.indication,
            primary_drug: entry.primary_drug,
            status: entry.status,
            countries_of_study: entry.countries_of_study,
            united_states: entry.united_states,
            international_priority: entry.international_priority,
            anchor_market: entry.anchor_market,
            execution_group: entry.execution_group,
            sponsoring_division: entry.sponsoring_division,
            ..Self::default()
        }
    }
}

impl StudyRecord {
    /// Copy the amounts and remaining budget of a ledger entry onto the record
    pub fn attach_budget(&mut self, budget: Option<&BudgetRecord>) {
        match budget {
            Some(budget) => {
                self.approved_amount = budget.approved_amount;
                self.total_paid = budget.total_paid;
                self.remaining_budget = budget.remaining_budget;
            }
            None => {
                self.approved_amount = None;
                self.total_paid = None;
                self.remaining_budget = RemainingBudget::Unknown;
            }
        }
    }
}

impl ArrowSchema for StudyRecord {
    fn schema() -> Schema {
        let mut fields: Vec<Field> = StudyField::ALL
            .iter()
            .map(|f| Field::new(f.column_name(), DataType::Utf8, true))
            .collect();
        fields.push(Field::new("APPROVED_AMOUNT", DataType::Float64, true));
        fields.push(Field::new("TOTAL_PAID", DataType::Float64, true));
        fields.push(Field::new("REMAINING_BUDGET", DataType::Utf8, false));
        Schema::new(fields)
    }
}

/// Text fields of a [`StudyRecord`] addressable by rules and filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudyField {
    Name,
    Title,
    StudyType,
    StudySubtype,
    StudySop,
    PrimaryDataCollection,
    SecondaryDataCollection,
    Pass,
    Pms,
    Category,
    HarmonizedCategory,
    Indication,
    PrimaryDrug,
    HarmonizedPrimaryDrug,
    HarmonizedDrugCategory,
    DrugPriority,
    Status,
    StatusDetail,
    CountriesOfStudy,
    UnitedStates,
    InternationalPriority,
    AnchorMarket,
    ExecutionGroup,
    SponsoringDivision,
}

impl StudyField {
    /// All text fields in output column order
    pub const ALL: [Self; 24] = [
        Self::Name,
        Self::Title,
        Self::StudyType,
        Self::StudySubtype,
        Self::StudySop,
        Self::PrimaryDataCollection,
        Self::SecondaryDataCollection,
        Self::Pass,
        Self::Pms,
        Self::Category,
        Self::HarmonizedCategory,
        Self::Indication,
        Self::PrimaryDrug,
        Self::HarmonizedPrimaryDrug,
        Self::HarmonizedDrugCategory,
        Self::DrugPriority,
        Self::Status,
        Self::StatusDetail,
        Self::CountriesOfStudy,
        Self::UnitedStates,
        Self::InternationalPriority,
        Self::AnchorMarket,
        Self::ExecutionGroup,
        Self::SponsoringDivision,
    ];

    /// Column name of this field in input and output tables
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Title => "TITLE",
            Self::StudyType => "STUDYTYPE",
            Self::StudySubtype => "STUDYSUBTYPE",
            Self::StudySop => "STUDYSOP",
            Self::PrimaryDataCollection => "PRIMARYDATACOLLECTION",
            Self::SecondaryDataCollection => "SECONDARYDATACOLLECTION",
            Self::Pass => "PASS",
            Self::Pms => "PMS",
            Self::Category => "CATEGORY",
            Self::HarmonizedCategory => "HARMONIZEDCATEGORY",
            Self::Indication => "INDICATION",
            Self::PrimaryDrug => "PRIMARYDRUG",
            Self::HarmonizedPrimaryDrug => "HARMONIZEDPRIMARYDRUG",
            Self::HarmonizedDrugCategory => "HARMONIZEDDRUGCATEGORY",
            Self::DrugPriority => "DRUGPRIORITY",
            Self::Status => "STATUS",
            Self::StatusDetail => "STATUSDETAIL",
            Self::CountriesOfStudy => "COUNTRIESOFSTUDY",
            Self::UnitedStates => "UNITEDSTATES",
            Self::InternationalPriority => "INTERNATIONALPRIORITY",
            Self::AnchorMarket => "ANCHORMARKET",
            Self::ExecutionGroup => "EXECUTIONGROUP",
            Self::SponsoringDivision => "SPONSORINGDIVISION",
        }
    }
}

impl RuleTarget for StudyRecord {
    type Field = StudyField;

    fn value(&self, field: StudyField) -> Option<&str> {
        match field {
            StudyField::Name => self.name.as_deref(),
            StudyField::Title => self.title.as_deref(),
            StudyField::StudyType => self.study_type.as_deref(),
            StudyField::StudySubtype => self.study_subtype.as_deref(),
            StudyField::StudySop => self.study_sop.as_deref(),
            StudyField::PrimaryDataCollection => self.primary_data_collection.as_deref(),
            StudyField::SecondaryDataCollection => self.secondary_data_collection.as_deref(),
            StudyField::Pass => self.pass.as_deref(),
            StudyField::Pms => self.pms.as_deref(),
            StudyField::Category => self.category.as_deref(),
            StudyField::HarmonizedCategory => self.harmonized_category.as_deref(),
            StudyField::Indication => self.indication.as_deref(),
            StudyField::PrimaryDrug => self.primary_drug.as_deref(),
            StudyField::HarmonizedPrimaryDrug => self.harmonized_primary_drug.as_deref(),
            StudyField::HarmonizedDrugCategory => self.harmonized_drug_category.as_deref(),
            StudyField::DrugPriority => self.drug_priority.as_deref(),
            StudyField::Status => self.status.as_deref(),
            StudyField::StatusDetail => self.status_detail.as_deref(),
            StudyField::CountriesOfStudy => self.countries_of_study.as_deref(),
            StudyField::UnitedStates => self.united_states.as_deref(),
            StudyField::InternationalPriority => self.international_priority.as_deref(),
            StudyField::AnchorMarket => self.anchor_market.as_deref(),
            StudyField::ExecutionGroup => self.execution_group.as_deref(),
            StudyField::SponsoringDivision => self.sponsoring_division.as_deref(),
        }
    }

    fn slot(&mut self, field: StudyField) -> &mut Option<String> {
        match field {
            StudyField::Name => &mut self.name,
            StudyField::Title => &mut self.title,
            StudyField::StudyType => &mut self.study_type,
            StudyField::StudySubtype => &mut self.study_subtype,
            StudyField::StudySop => &mut self.study_sop,
            StudyField::PrimaryDataCollection => &mut self.primary_data_collection,
            StudyField::SecondaryDataCollection => &mut self.secondary_data_collection,
            StudyField::Pass => &mut self.pass,
            StudyField::Pms => &mut self.pms,
            StudyField::Category => &mut self.category,
            StudyField::HarmonizedCategory => &mut self.harmonized_category,
            StudyField::Indication => &mut self.indication,
            StudyField::PrimaryDrug => &mut self.primary_drug,
            StudyField::HarmonizedPrimaryDrug => &mut self.harmonized_primary_drug,
            StudyField::HarmonizedDrugCategory => &mut self.harmonized_drug_category,
            StudyField::DrugPriority => &mut self.drug_priority,
            StudyField::Status => &mut self.status,
            StudyField::StatusDetail => &mut self.status_detail,
            StudyField::CountriesOfStudy => &mut self.countries_of_study,
            StudyField::UnitedStates => &mut self.united_states,
            StudyField::InternationalPriority => &mut self.international_priority,
            StudyField::AnchorMarket => &mut self.anchor_market,
            StudyField::ExecutionGroup => &mut self.execution_group,
            StudyField::SponsoringDivision => &mut self.sponsoring_division,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_every_serialized_field() {
        let schema = StudyRecord::schema();
        assert_eq!(schema.fields().len(), StudyField::ALL.len() + 3);
        assert_eq!(schema.field(0).name(), "NAME");
        assert_eq!(schema.field(schema.fields().len() - 1).name(), "REMAINING_BUDGET");
    }

    #[test]
    fn test_field_slots_round_trip() {
        let mut record = StudyRecord::default();
        for field in StudyField::ALL {
            *record.slot(field) = Some(field.column_name().to_string());
        }
        for field in StudyField::ALL {
            assert_eq!(record.value(field), Some(field.column_name()));
        }
    }

    #[test]
    fn test_attach_budget_without_entry_is_unknown() {
        let mut record = StudyRecord {
            approved_amount: Some(5.0),
            remaining_budget: RemainingBudget::Yes,
            ..StudyRecord::default()
        };
        record.attach_budget(None);
        assert_eq!(record.approved_amount, None);
        assert_eq!(record.total_paid, None);
        assert_eq!(record.remaining_budget, RemainingBudget::Unknown);
    }

    #[test]
    fn test_to_record_batch() {
        let records = vec![StudyRecord {
            name: Some("NIS-1".to_string()),
            approved_amount: Some(10.0),
            ..StudyRecord::default()
        }];
        let batch = StudyRecord::to_record_batch(&records).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), StudyRecord::schema().fields().len());
    }
}
