//! Country Expansion Pipeline
//!
//! Produces one row per (study, country) from the harmonized records:
//!
//! 1. split the country list on `|`
//! 2. correct compound ISO names
//! 3. split on `,`
//! 4. canonicalize each name, taking the study's `UNITEDSTATES` flag into account
//! 5. upper-case and de-duplicate
//! 6. attach the country code
//!
//! Identical rows produced by different records are collapsed, keeping the
//! first occurrence.

pub mod canonical;
pub mod tokenizer;

use itertools::Itertools;

use crate::algorithm::rules::RuleSet;
use crate::error::Result;
use crate::models::country::CountryRow;
use crate::models::study::StudyRecord;
use crate::reference::CountryCodeMapping;
use crate::utils::logging::log_stage;

pub use canonical::{
    CompoundNameCorrections, CountryCandidate, CountryField, canonical_country_rules,
};
pub use tokenizer::{split_list, split_names};

/// Expands study country lists into canonical country names
#[derive(Debug, Clone)]
pub struct CountryExpander {
    corrections: CompoundNameCorrections,
    canonical: RuleSet<CountryField>,
}

impl CountryExpander {
    /// Compile the corrections and build the canonicalization rules
    pub fn new() -> Result<Self> {
        Ok(Self {
            corrections: CompoundNameCorrections::new()?,
            canonical: canonical_country_rules(),
        })
    }

    /// Canonical, upper-case, de-duplicated country names of one country list
    #[must_use]
    pub fn expand(&self, countries: &str, united_states: Option<&str>) -> Vec<String> {
        let corrected = split_list(countries)
            .into_iter()
            .map(|token| self.corrections.apply(&token));

        split_names(corrected)
            .into_iter()
            .filter_map(|name| {
                let mut candidate = CountryCandidate::new(name, united_states);
                self.canonical.apply(&mut candidate);
                candidate.country
            })
            .map(|name| name.to_uppercase())
            .unique()
            .collect()
    }

    /// One row per (study, country), with codes from the country code table.
    /// Records without a country list produce no rows.
    #[must_use]
    pub fn expand_all(&self, records: &[StudyRecord], codes: &CountryCodeMapping) -> Vec<CountryRow> {
        let mut unmatched = 0usize;
        let rows: Vec<CountryRow> = records
            .iter()
            .filter_map(|record| {
                let countries = record.countries_of_study.as_deref()?;
                Some(
                    self.expand(countries, record.united_states.as_deref())
                        .into_iter()
                        .map(move |country| (record, country)),
                )
            })
            .flatten()
            .map(|(record, country)| {
                let code = codes.first(&country).cloned().flatten();
                if code.is_none() {
                    unmatched += 1;
                }
                CountryRow {
                    name: record.name.clone(),
                    countries_of_study: record.countries_of_study.clone(),
                    country,
                    united_states: record.united_states.clone(),
                    status: record.status.clone(),
                    study_sop: record.study_sop.clone(),
                    code,
                }
            })
            .unique()
            .collect();

        if unmatched > 0 {
            log::warn!("{unmatched} study countries have no country code");
        }
        log_stage("Country expansion", records.len(), rows.len());
        rows
    }
}
