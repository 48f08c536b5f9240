//! Canonical country names
//!
//! Historic, colloquial and compound ISO names are rewritten to the names
//! used by the country code table.

use regex::{NoExpand, Regex};

use crate::algorithm::rules::{Action, Condition, OverrideRule, RuleSet, RuleTarget};
use crate::error::{HarmonizeError, Result};

/// Corrections applied to `|`-separated tokens before they are split on
/// commas, in order. Patterns are regular expressions.
pub const COMPOUND_NAME_CORRECTIONS: &[(&str, &str)] = &[
    (
        "VENEZUELA, BOLIVARIAN REPUBLIC OF",
        "VENEZUELA (BOLIVARIAN REPUBLIC OF)",
    ),
    (
        "KOREA, DEMOCRATIC PEOPLE'S REPUBLIC OF",
        "KOREA THE DEMOCRATIC PEOPLE'S REPUBLIC OF",
    ),
    ("KOREA, REPUBLIC OF", "KOREA"),
    ("VIRGIN ISLANDS, U.S.", "VIRGIN ISLANDS (U.S.)"),
    ("IRAN, ISLAMIC REPUBLIC OF", "IRAN"),
    ("PALESTINIAN TERRITORY, OCCUPIED", "ISRAEL"),
    ("TANZANIA, UNITED REPUBLIC OF", "TANZANIA"),
    ("ZAIRE", "CONGO DEMOCRATIC"),
    ("CONGO, THE DEMOCRATIC REPUBLIC OF THE", "CONGO DEMOCRATIC"),
    ("THE FORMER YUGOSLAV REPUBLIC OF", "REPUBLIC OF NORTH MACEDONIA"),
    ("MOLDOVA, REPUBLIC OF", "Moldova (THE REPUBLIC OF)"),
];

/// Single-name aliases
pub const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("VIETNAM", "VIET NAM"),
    ("SLOVAKIA (SLOVAK REPUBLIC)", "SLOVAKIA"),
    ("CROATIA (LOCAL NAME: HRVATSKA)", "CROATIA"),
    ("CZECH REPUBLIC", "CZECHIA"),
    ("USA", "UNITED STATES"),
    ("UK", "UNITED KINGDOM"),
    ("SOUTH KOREA", "KOREA"),
    ("CHINA", "Province Of China"),
    ("MACEDONIA", "Republic of North Macedonia"),
    ("CZECHOSLAVAKIA", "Slovakia"),
    ("SWAZILAND", "ESWATINI"),
    ("BOSNIA AND HERZEGOVINA", "BOSNIA"),
    ("NETHERLANDS ANTILLES", "SINT MAARTEN (DUTCH PART)"),
    ("GERMAN DEMOCRATIC REPUBLIC", "GERMANY"),
    ("USSR", "RUSSIAN FEDERATION"),
];

/// Former states now reported as Serbia
pub const SERBIA_PREDECESSORS: &[&str] = &["YUGOSLAVIA", "SERBIA AND MONTENEGRO"];

/// Placeholder entries that stand for the United States when the study is
/// flagged as conducted there
pub const UNITED_STATES_PLACEHOLDERS: &[&str] =
    &["UNKNOWN", "CÃ—TE D'IVOIRE", "NA; SINGLE COUNTRY", "EAST EUROPE"];

/// Compiled compound-name corrections
#[derive(Debug, Clone)]
pub struct CompoundNameCorrections {
    patterns: Vec<(Regex, &'static str)>,
}

impl CompoundNameCorrections {
    /// Compile [`COMPOUND_NAME_CORRECTIONS`]
    pub fn new() -> Result<Self> {
        Self::from_pairs(COMPOUND_NAME_CORRECTIONS)
    }

    /// Compile an ordered list of (pattern, replacement) pairs
    pub fn from_pairs(pairs: &[(&str, &'static str)]) -> Result<Self> {
        let patterns = pairs
            .iter()
            .map(|&(pattern, replacement)| {
                Regex::new(pattern)
                    .map(|regex| (regex, replacement))
                    .map_err(|source| HarmonizeError::Pattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Apply every correction to a token, in order
    #[must_use]
    pub fn apply(&self, token: &str) -> String {
        self.patterns
            .iter()
            .fold(token.to_string(), |current, (regex, replacement)| {
                regex.replace_all(&current, NoExpand(replacement)).into_owned()
            })
    }
}

/// Fields of a country candidate addressable by rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryField {
    /// Upper-cased country token
    Country,
    /// The study's `UNITEDSTATES` flag
    UnitedStates,
}

/// One country token of a study, with the flag canonicalization depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCandidate {
    pub country: Option<String>,
    pub united_states: Option<String>,
}

impl CountryCandidate {
    #[must_use]
    pub fn new(country: impl Into<String>, united_states: Option<&str>) -> Self {
        Self {
            country: Some(country.into()),
            united_states: united_states.map(str::to_string),
        }
    }
}

impl RuleTarget for CountryCandidate {
    type Field = CountryField;

    fn value(&self, field: CountryField) -> Option<&str> {
        match field {
            CountryField::Country => self.country.as_deref(),
            CountryField::UnitedStates => self.united_states.as_deref(),
        }
    }

    fn slot(&mut self, field: CountryField) -> &mut Option<String> {
        match field {
            CountryField::Country => &mut self.country,
            CountryField::UnitedStates => &mut self.united_states,
        }
    }
}

/// Build the canonicalization rules.
///
/// No rule writes a value another rule matches, so at most one rule fires
/// per candidate.
#[must_use]
pub fn canonical_country_rules() -> RuleSet<CountryField> {
    use CountryField::{Country, UnitedStates};

    let mut rules: Vec<_> = COUNTRY_ALIASES
        .iter()
        .map(|&(alias, canonical)| OverrideRule::rewrite(Country, alias, canonical))
        .collect();
    rules.push(OverrideRule::new(
        Condition::OneOf(Country, SERBIA_PREDECESSORS),
        Action::Set(Country, "SERBIA"),
    ));
    rules.push(OverrideRule::new(
        Condition::All(vec![
            Condition::OneOf(Country, UNITED_STATES_PLACEHOLDERS),
            Condition::Equals(UnitedStates, "Yes"),
        ]),
        Action::Set(Country, "UNITED STATES"),
    ));

    RuleSet::new("COUNTRY", rules)
}
