//! Harmonization algorithms
//!
//! The record pipeline ([`harmonize`]), the ordered rule engine it is built
//! on ([`rules`]), the dashboard pre-filter ([`filters`]) and the country
//! expansion ([`country`]).

pub mod country;
pub mod filters;
pub mod harmonize;
pub mod rules;

pub use country::CountryExpander;
pub use filters::{FilterCriteria, StudyFilter, apply_filter, dashboard_pre_filter};
pub use harmonize::Harmonizer;
pub use rules::{Action, Condition, OverrideRule, RuleSet, RuleTarget, apply_overrides};
