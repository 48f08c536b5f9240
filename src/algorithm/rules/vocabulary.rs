//! Controlled-vocabulary rewrites
//!
//! Free-text catalog fields are mapped onto the reporting vocabulary. Each
//! field gets its own [`RuleSet`] so firing counts are logged per field.

use super::{Action, Condition, OverrideRule, RuleSet};
use crate::models::study::StudyField;

/// Unconditional substring replacements on `EXECUTIONGROUP`, applied in order
/// before the exact rewrites
const EXECUTION_GROUP_SUBSTRINGS: &[(&str, &str)] = &[
    ("Alliance Partner (SMPA Inc.)", "Alliance Partner"),
    ("Center of Excellence", "RWE"),
    ("China Medical Affairs", "Country Medical Affairs"),
    ("China", "Country Medical Affairs"),
    ("Country Med/RWE", "Country Medical Affairs"),
    ("Denmark", "Country Medical Affairs"),
    ("Finland Medical Affairs", "Country Medical Affairs"),
    ("France medical affairs", "Country Medical Affairs"),
    ("GMA", "Medical Affairs"),
    ("HEOR", "GAV"),
    ("PHI", "GAV"),
];

/// Exact `EXECUTIONGROUP` rewrites
const EXECUTION_GROUP_REWRITES: &[(&str, &str)] = &[
    ("Country Medical", "Country Medical Affairs"),
    ("GAV (HV&E)", "GAV"),
    ("GAV (HV&E) and Medical", "GAV, Medical Affairs"),
    ("GAV co leading with medical", "GAV, Medical Affairs"),
    ("GAV, HVE Primary Care (ELIQUIS)", "GAV, Medical Affairs"),
    ("Global Medical", "Medical Affairs"),
    ("Israel Medical Affairs", "Country Medical Affairs"),
    ("Japan", "Country Medical Affairs"),
    (
        "Japan (Xu, Linghua) from Outcome &Evidence group",
        "Country H&V",
    ),
    ("Japan Medical", "Country Medical Affairs"),
    ("Japan Medical Team", "Country Medical Affairs"),
    ("Korea", "Country Medical Affairs"),
    ("Korea/Local PV", "Korea PMS"),
    ("Legacy Medical", "Medical Affairs"),
    (
        "Local Medical affairs and RWE",
        "Country Medical Affairs, Country RWE",
    ),
    ("Local RWE", "Country RWE"),
    ("Local RWE/Columbia", "Country RWE"),
    ("MEDICAL AFFAIR", "Medical Affairs"),
    ("Medical", "Medical Affairs"),
    (
        "Medical Affairs of Breast Cancer (Owner) but is supported by RWE, Quality, Compliance, and Legal)",
        "Medical Affairs",
    ),
    ("Medical affairs", "Medical Affairs"),
    ("PMS Affairs, Development Japan", "Japan PMS"),
    ("Polish medical team", "Country Medical Affairs"),
    ("RWE France", "Country RWE"),
    ("RWE, Korean Post Marketing Surveillance", "Korea PMS"),
    (
        "Set up in old structure so being run out of Emerging Market medical group",
        "Emerging Markets Medical Affairs",
    ),
    ("Transferred to Merck", "Alliance Partner"),
    ("UK", "Country Medical Affairs"),
    ("UK Medical Affairs", "Country Medical Affairs"),
];

/// `EXECUTIONGROUP` values that are placeholders rather than groups
const EXECUTION_GROUP_PLACEHOLDER: &str = "Unconfirmed";

/// Substring marking automated-engine entries, which have no group
const ENGINE_MARKER: &str = "ENGINE";

/// Indications always reported under the rare disease category
pub const RARE_DISEASE_INDICATIONS: &[&str] = &[
    "ATTR-CM (Transthyretin Amyloid Cardiomyopathy)",
    "Acromegaly",
    "Hemophilia",
    "Duchenne Muscular Dystrophy",
    "Sickle Cell Disease",
];

/// Rewrite `EXECUTIONGROUP` into the reporting group names
#[must_use]
pub fn execution_group_rules() -> RuleSet<StudyField> {
    use StudyField::ExecutionGroup;

    let substrings = EXECUTION_GROUP_SUBSTRINGS
        .iter()
        .map(|&(from, to)| OverrideRule::replace_substring(ExecutionGroup, from, to));
    let rewrites = EXECUTION_GROUP_REWRITES
        .iter()
        .map(|&(from, to)| OverrideRule::rewrite(ExecutionGroup, from, to));

    let mut rules: Vec<_> = substrings.chain(rewrites).collect();
    rules.push(OverrideRule::new(
        Condition::Equals(ExecutionGroup, EXECUTION_GROUP_PLACEHOLDER),
        Action::Clear(ExecutionGroup),
    ));
    rules.push(OverrideRule::new(
        Condition::Contains(ExecutionGroup, ENGINE_MARKER),
        Action::Clear(ExecutionGroup),
    ));

    RuleSet::new("EXECUTIONGROUP", rules)
}

/// Mark studies without a harmonized drug as `No Drug`
#[must_use]
pub fn drug_priority_rules() -> RuleSet<StudyField> {
    use StudyField::{DrugPriority, HarmonizedPrimaryDrug};

    RuleSet::new(
        "DRUGPRIORITY",
        vec![OverrideRule::new(
            Condition::Any(vec![
                Condition::Equals(HarmonizedPrimaryDrug, "Not Applicable"),
                Condition::Missing(HarmonizedPrimaryDrug),
            ]),
            Action::Set(DrugPriority, "No Drug"),
        )],
    )
}

/// Force the rare disease category for known rare indications
#[must_use]
pub fn category_rules() -> RuleSet<StudyField> {
    RuleSet::new(
        "HARMONIZEDCATEGORY",
        vec![OverrideRule::new(
            Condition::OneOf(StudyField::Indication, RARE_DISEASE_INDICATIONS),
            Action::Set(StudyField::HarmonizedCategory, "Rare Disease"),
        )],
    )
}

/// Title-case the `PASS` and `PMS` flags and expand single-letter answers
#[must_use]
pub fn flag_rules() -> RuleSet<StudyField> {
    use StudyField::{Pass, Pms};

    RuleSet::new(
        "PASS/PMS",
        vec![
            OverrideRule::new(Condition::Always, Action::TitleCase(Pass)),
            OverrideRule::new(Condition::Always, Action::TitleCase(Pms)),
            OverrideRule::rewrite(Pms, "N", "No"),
            OverrideRule::rewrite(Pms, "Y", "Yes"),
        ],
    )
}

/// Display form of `COUNTRIESOFSTUDY`: title case, comma separated
#[must_use]
pub fn countries_display_rules() -> RuleSet<StudyField> {
    use StudyField::CountriesOfStudy;

    RuleSet::new(
        "COUNTRIESOFSTUDY",
        vec![
            OverrideRule::new(Condition::Always, Action::TitleCase(CountriesOfStudy)),
            OverrideRule::replace_substring(CountriesOfStudy, "|", ","),
            OverrideRule::replace_substring(CountriesOfStudy, "Taiwan, Province Of China", "Taiwan"),
        ],
    )
}

/// All vocabulary rule sets in pipeline order
#[must_use]
pub fn vocabulary_rules() -> Vec<RuleSet<StudyField>> {
    vec![
        drug_priority_rules(),
        flag_rules(),
        category_rules(),
        execution_group_rules(),
    ]
}
