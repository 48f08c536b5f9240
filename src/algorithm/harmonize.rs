//! Harmonization Pipeline
//!
//! Turns raw catalog entries into harmonized study records. Stages run in a
//! fixed order and each consumes the table produced by the previous one:
//!
//! 1. asset join
//! 2. category join, with the drug's own category taking precedence
//! 3. `STUDYSOP` classification and subtype display text
//! 4. country list display text
//! 5. controlled-vocabulary rewrites
//! 6. status join
//! 7. budget join
//!
//! Joins are left joins. A key with several reference entries expands the
//! study into one row per entry.

use crate::algorithm::rules::classification::{study_sop_rules, study_subtype_rules};
use crate::algorithm::rules::vocabulary::{countries_display_rules, vocabulary_rules};
use crate::algorithm::rules::RuleSet;
use crate::models::study::{CatalogEntry, StudyField, StudyRecord};
use crate::reference::{AssetEntry, BudgetLedger, ResolvedReferences, grant_key};
use crate::utils::logging::log_stage;
use crate::utils::text::{normalize_status, reference_key};

/// Value written to `STATUS` before the status join when the catalog has none
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Left join `records` against reference values, one output row per match.
///
/// `attach` receives `None` for records without a match, so it can reset
/// the joined fields.
fn left_join<'r, V: 'r>(
    records: Vec<StudyRecord>,
    matches: impl Fn(&StudyRecord) -> &'r [V],
    attach: impl Fn(&mut StudyRecord, Option<&V>),
) -> Vec<StudyRecord> {
    let mut joined = Vec::with_capacity(records.len());
    for mut record in records {
        match matches(&record).split_last() {
            None => {
                attach(&mut record, None);
                joined.push(record);
            }
            Some((last, rest)) => {
                for value in rest {
                    let mut expanded = record.clone();
                    attach(&mut expanded, Some(value));
                    joined.push(expanded);
                }
                attach(&mut record, Some(last));
                joined.push(record);
            }
        }
    }
    joined
}

/// Runs the harmonization stages against one set of references
pub struct Harmonizer<'a> {
    references: &'a ResolvedReferences,
    ledger: &'a BudgetLedger,
    classification: [RuleSet<StudyField>; 2],
    countries_display: RuleSet<StudyField>,
    vocabulary: Vec<RuleSet<StudyField>>,
}

impl<'a> Harmonizer<'a> {
    /// Create a harmonizer over resolved references and the grants ledger
    #[must_use]
    pub fn new(references: &'a ResolvedReferences, ledger: &'a BudgetLedger) -> Self {
        Self {
            references,
            ledger,
            classification: [study_sop_rules(), study_subtype_rules()],
            countries_display: countries_display_rules(),
            vocabulary: vocabulary_rules(),
        }
    }

    /// Run every stage over the catalog
    #[must_use]
    pub fn harmonize(&self, catalog: Vec<CatalogEntry>) -> Vec<StudyRecord> {
        let records: Vec<StudyRecord> = catalog.into_iter().map(StudyRecord::from).collect();
        log::info!("Harmonizing {} catalog entries", records.len());

        let mut records = self.join_categories(self.join_assets(records));
        self.classify(&mut records);
        self.normalize_vocabulary(&mut records);

        let records = self.join_status(records);
        self.join_budget(records)
    }

    /// Attach harmonized drug, priority and drug category by `PRIMARYDRUG`
    #[must_use]
    pub fn join_assets(&self, records: Vec<StudyRecord>) -> Vec<StudyRecord> {
        let rows_in = records.len();
        let assets = &self.references.assets;
        let joined = left_join(
            records,
            move |r| assets.lookup(r.primary_drug.as_deref(), reference_key),
            |r, entry: Option<&AssetEntry>| {
                let entry = entry.cloned().unwrap_or_default();
                r.harmonized_primary_drug = entry.harmonized_primary_drug;
                r.drug_priority = entry.drug_priority;
                r.harmonized_drug_category = entry.harmonized_drug_category;
            },
        );
        log_stage("Asset join", rows_in, joined.len());
        joined
    }

    /// Attach `HARMONIZEDCATEGORY` by `CATEGORY`; a drug category from the
    /// asset join overrides it
    #[must_use]
    pub fn join_categories(&self, records: Vec<StudyRecord>) -> Vec<StudyRecord> {
        let rows_in = records.len();
        let categories = &self.references.categories;
        let joined = left_join(
            records,
            move |r| categories.lookup(r.category.as_deref(), reference_key),
            |r, category: Option<&Option<String>>| {
                r.harmonized_category = match &r.harmonized_drug_category {
                    Some(drug_category) => Some(drug_category.clone()),
                    None => category.cloned().flatten(),
                };
            },
        );
        log_stage("Category join", rows_in, joined.len());
        joined
    }

    /// Derive `STUDYSOP` and rewrite subtype display text
    pub fn classify(&self, records: &mut [StudyRecord]) {
        for rules in &self.classification {
            rules.apply_all(records);
        }
        log_stage("Classification", records.len(), records.len());
    }

    /// Country list display text and controlled-vocabulary rewrites
    pub fn normalize_vocabulary(&self, records: &mut [StudyRecord]) {
        self.countries_display.apply_all(records);
        for rules in &self.vocabulary {
            rules.apply_all(records);
        }
        log_stage("Vocabulary", records.len(), records.len());
    }

    /// Replace `STATUS` with the harmonized status and fill `STATUSDETAIL`.
    /// Unmatched statuses leave both null.
    #[must_use]
    pub fn join_status(&self, mut records: Vec<StudyRecord>) -> Vec<StudyRecord> {
        let mut unmatched = 0usize;
        for record in &mut records {
            let native = normalize_status(record.status.as_deref().unwrap_or(UNKNOWN_STATUS));
            match self.references.statuses.resolve(&native) {
                Some(harmonized) => {
                    record.status = harmonized.status.clone();
                    record.status_detail = harmonized.detail.clone();
                }
                None => {
                    unmatched += 1;
                    record.status = None;
                    record.status_detail = None;
                }
            }
        }
        if unmatched > 0 {
            log::warn!("{unmatched} rows have a status with no harmonized mapping");
        }
        log_stage("Status join", records.len(), records.len());
        records
    }

    /// Attach approved and paid amounts and the remaining budget by `NAME`
    #[must_use]
    pub fn join_budget(&self, records: Vec<StudyRecord>) -> Vec<StudyRecord> {
        let rows_in = records.len();
        let ledger = self.ledger;
        let joined = left_join(
            records,
            move |r| ledger.lookup(r.name.as_deref(), grant_key),
            StudyRecord::attach_budget,
        );
        log_stage("Budget join", rows_in, joined.len());
        joined
    }
}
