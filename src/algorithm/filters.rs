//! Dashboard pre-filter
//!
//! Rows excluded from the reporting dashboard: interventional trials and
//! studies run by groups or divisions outside its scope.

use crate::algorithm::rules::RuleTarget;
use crate::models::study::{StudyField, StudyRecord};

/// Defines a criterion for filtering study records
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}

/// A filter that can be applied to a study record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyFilter {
    /// Keep rows whose field is not one of the values. A missing value is
    /// never excluded.
    NotIn {
        /// Field to check
        field: StudyField,
        /// Excluded values, compared exactly
        values: &'static [&'static str],
    },
    /// Combined filter that requires all criteria to be met
    All(Vec<StudyFilter>),
}

impl FilterCriteria<StudyRecord> for StudyFilter {
    fn meets_criteria(&self, record: &StudyRecord) -> bool {
        match self {
            Self::NotIn { field, values } => record
                .value(*field)
                .is_none_or(|value| !values.iter().any(|v| *v == value)),
            Self::All(filters) => filters.iter().all(|f| f.meets_criteria(record)),
        }
    }
}

/// Execution groups excluded from the dashboard
pub const EXCLUDED_EXECUTION_GROUPS: &[&str] = &["SSR", "GME"];

/// Sponsoring divisions excluded from the dashboard
pub const EXCLUDED_SPONSORING_DIVISIONS: &[&str] = &[
    "RU",
    "GMG",
    "PRD",
    "Corporate Affairs",
    "WRD",
    "CONSUMER HEALTHCARE",
    "BRDU",
    "WRD TECHNOLOGY",
];

/// The dashboard exclusion list as a single filter
#[must_use]
pub fn dashboard_pre_filter() -> StudyFilter {
    StudyFilter::All(vec![
        StudyFilter::NotIn {
            field: StudyField::StudySop,
            values: &["CT02"],
        },
        StudyFilter::NotIn {
            field: StudyField::ExecutionGroup,
            values: EXCLUDED_EXECUTION_GROUPS,
        },
        StudyFilter::NotIn {
            field: StudyField::SponsoringDivision,
            values: EXCLUDED_SPONSORING_DIVISIONS,
        },
    ])
}

/// Keep the rows meeting a filter, preserving order
pub fn apply_filter<T, F: FilterCriteria<T>>(rows: Vec<T>, filter: &F) -> Vec<T> {
    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| filter.meets_criteria(row))
        .collect();
    log::info!("Pre-filter removed {} of {} rows", before - kept.len(), before);
    kept
}
