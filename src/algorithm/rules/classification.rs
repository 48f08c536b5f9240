//! Study operating-procedure classification
//!
//! `STUDYSOP` is derived by an ordered chain of overrides. Catalog codes are
//! corrected first, title keywords and study type then mark trials, anything
//! still unset falls back to `CT24`, and finally the data-collection answers,
//! subtype and study type force their own codes.

use super::{Action, Condition, OverrideRule, RuleSet};
use crate::models::study::StudyField;

/// Default code for studies no other rule classifies
pub const DEFAULT_SOP: &str = "CT24";

/// Code for interventional clinical trials
pub const TRIAL_SOP: &str = "CT02";

/// Title substrings that mark a study as an interventional trial.
/// Matched case-sensitively, so each casing is listed.
pub const TRIAL_TITLE_KEYWORDS: &[&str] = &[
    "Phase 1",
    "PHASE 1",
    "Phase I",
    "PHASE I",
    "Phase 2",
    "PHASE 2",
    "Phase II",
    "PHASE II",
    "Phase 3",
    "PHASE 3",
    "Phase III",
    "PHASE III",
    "randomized",
    "Randomized",
    "RANDOMIZED",
    "randomised",
    "Randomised",
    "RANDOMISED",
    "double blind",
    "Double Blind",
    "DOUBLE BLIND",
];

const PRIMARY_COLLECTION_CT24: &[&str] = &[
    "YES - CT24, INVOLVES INVESTIGATORS/SITES AND ONLY USES SURVEYS, QUESTIONNAIRES, OR INTERVIEWS",
    "YES - CT24, NO INVESTIGATORS/SITES AND ONLY USES SURVEYS, QUESTIONNAIRES, OR INTERVIEWS",
    "YES - CT24, INVOLVES INVESTIGATORS/SITES AND IS NOT LIMITED TO SURVEYS, QUESTIONNAIRES OR INTERVIEWS",
    "YES - CT24, NO INVESTIGATORS/SITES AND IS NOT LIMITED TO SURVEYS, QUESTIONNAIRES, OR INTERVIEWS",
    "YES - CT24, YES INVESTIGATORS/SITES AND ONLY USES SURVEYS, QUESTIONNAIRES, OR INTERVIEWS",
];

const PRIMARY_COLLECTION_CT45: &str = "YES - CT45, INVESTIGATORS/SITES";

const SECONDARY_COLLECTION_CT24: &[&str] = &[
    "YES - CT24, STRUCTURED DATA ANALYSIS",
    "NO - CT24, PRIMARY DATA COLLECTION STUDY",
    "YES - CT24, HUMAN REVIEW OF UNSTRUCTURED DATA- WITH SITES/INVESTIGATORS",
    "YES - CT24, HUMAN REVIEW OF UNSTRUCTURED DATA- WITHOUT SITES/INVESTIGATORS",
];

/// Catalog subtypes of low-interventional studies and their display text
const LOW_INTERVENTIONAL_SUBTYPES: &[(&str, &str)] = &[
    ("LOW INTERVENTIONAL STUDY 1", "Low Interventional Study 1"),
    ("LOW INTERVENTIONAL STUDY 2", "Low Interventional Study 2"),
    (
        "Non-Interventional/Low-Interventional Study Type 1",
        "Low Interventional Study 1",
    ),
    ("PRAGMATIC CLINICAL TRIAL 2", "Low Interventional Study 2"),
];

/// Study types whose name doubles as their subtype and which are grants
const GRANT_STUDY_TYPES: &[&str] = &["Investigator Sponsored Research", "General Research"];

/// Build the ordered `STUDYSOP` rule chain
#[must_use]
pub fn study_sop_rules() -> RuleSet<StudyField> {
    use StudyField::{
        PrimaryDataCollection, SecondaryDataCollection, StudySop, StudySubtype, StudyType, Title,
    };

    let mut rules = vec![
        OverrideRule::rewrite(StudySop, "GMG", "GNT01"),
        OverrideRule::rewrite(StudySop, "CT24; CT34", DEFAULT_SOP),
        OverrideRule::new(Condition::Equals(StudySop, "0"), Action::Clear(StudySop)),
        OverrideRule::new(
            Condition::ContainsAny(Title, TRIAL_TITLE_KEYWORDS),
            Action::Set(StudySop, TRIAL_SOP),
        ),
        OverrideRule::new(
            Condition::EqualsIgnoreCase(StudyType, "Interventional"),
            Action::Set(StudySop, TRIAL_SOP),
        ),
        OverrideRule::new(Condition::Missing(StudySop), Action::Set(StudySop, DEFAULT_SOP)),
        OverrideRule::new(
            Condition::OneOf(PrimaryDataCollection, PRIMARY_COLLECTION_CT24),
            Action::Set(StudySop, DEFAULT_SOP),
        ),
        OverrideRule::set_if_equals(PrimaryDataCollection, PRIMARY_COLLECTION_CT45, StudySop, "CT45"),
        OverrideRule::new(
            Condition::OneOf(SecondaryDataCollection, SECONDARY_COLLECTION_CT24),
            Action::Set(StudySop, DEFAULT_SOP),
        ),
    ];

    rules.extend(
        LOW_INTERVENTIONAL_SUBTYPES
            .iter()
            .map(|&(subtype, _)| OverrideRule::set_if_equals(StudySubtype, subtype, StudySop, "CT45")),
    );
    rules.push(OverrideRule::set_if_equals(
        StudyType,
        "Research Collaboration",
        StudySop,
        "RC01",
    ));
    rules.extend(
        GRANT_STUDY_TYPES
            .iter()
            .map(|&study_type| OverrideRule::set_if_equals(StudyType, study_type, StudySop, "GNT01")),
    );

    RuleSet::new("STUDYSOP", rules)
}

/// Build the `STUDYSUBTYPE` display rewrites
///
/// Must run after [`study_sop_rules`], which reads the raw subtype values.
#[must_use]
pub fn study_subtype_rules() -> RuleSet<StudyField> {
    use StudyField::{StudySubtype, StudyType};

    let rules = LOW_INTERVENTIONAL_SUBTYPES
        .iter()
        .map(|&(raw, display)| OverrideRule::rewrite(StudySubtype, raw, display))
        .chain(
            GRANT_STUDY_TYPES
                .iter()
                .map(|&study_type| OverrideRule::set_if_equals(StudyType, study_type, StudySubtype, study_type)),
        )
        .collect();

    RuleSet::new("STUDYSUBTYPE", rules)
}
