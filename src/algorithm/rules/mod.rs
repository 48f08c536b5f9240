//! Ordered override rules
//!
//! Every conditional rewrite in the pipeline is expressed as data: an
//! [`OverrideRule`] pairs a [`Condition`] with an [`Action`], and a
//! [`RuleSet`] evaluates its rules strictly in order against the current
//! state of a row. A later rule sees the writes of earlier rules and may
//! overwrite them, so the last matching rule for a field wins.

pub mod classification;
pub mod vocabulary;

use std::fmt::Debug;

use crate::utils::text::title_case;

/// A row whose text fields can be read and rewritten by rules
pub trait RuleTarget {
    /// Field selector for this row type
    type Field: Copy + Debug;

    /// Current value of a field
    fn value(&self, field: Self::Field) -> Option<&str>;

    /// Mutable slot of a field
    fn slot(&mut self, field: Self::Field) -> &mut Option<String>;
}

/// Predicate evaluated against a row before a rule fires
///
/// Comparisons against a missing value never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<F> {
    /// Always matches
    Always,
    /// Field equals the literal exactly
    Equals(F, &'static str),
    /// Field equals the literal, ignoring ASCII case
    EqualsIgnoreCase(F, &'static str),
    /// Field equals one of the literals exactly
    OneOf(F, &'static [&'static str]),
    /// Field contains the literal as a substring
    Contains(F, &'static str),
    /// Field contains at least one of the literals as a substring
    ContainsAny(F, &'static [&'static str]),
    /// Field is missing
    Missing(F),
    /// All nested conditions match
    All(Vec<Condition<F>>),
    /// Any nested condition matches
    Any(Vec<Condition<F>>),
}

impl<F: Copy> Condition<F> {
    /// Determine if a row meets this condition
    pub fn matches<T: RuleTarget<Field = F>>(&self, target: &T) -> bool {
        match self {
            Self::Always => true,
            Self::Equals(field, literal) => target.value(*field) == Some(*literal),
            Self::EqualsIgnoreCase(field, literal) => target
                .value(*field)
                .is_some_and(|v| v.eq_ignore_ascii_case(literal)),
            Self::OneOf(field, literals) => target
                .value(*field)
                .is_some_and(|v| literals.iter().any(|l| *l == v)),
            Self::Contains(field, literal) => {
                target.value(*field).is_some_and(|v| v.contains(literal))
            }
            Self::ContainsAny(field, literals) => target
                .value(*field)
                .is_some_and(|v| literals.iter().any(|l| v.contains(l))),
            Self::Missing(field) => target.value(*field).is_none(),
            Self::All(conditions) => conditions.iter().all(|c| c.matches(target)),
            Self::Any(conditions) => conditions.iter().any(|c| c.matches(target)),
        }
    }
}

/// Rewrite applied when a rule's condition matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<F> {
    /// Overwrite the field with a literal
    Set(F, &'static str),
    /// Null the field
    Clear(F),
    /// Replace every occurrence of a substring inside the field
    ReplaceAll {
        /// Field to rewrite
        field: F,
        /// Substring to look for
        from: &'static str,
        /// Replacement text
        to: &'static str,
    },
    /// Title-case the field
    TitleCase(F),
}

impl<F: Copy> Action<F> {
    /// Apply this action to a row
    pub fn apply<T: RuleTarget<Field = F>>(&self, target: &mut T) {
        match self {
            Self::Set(field, literal) => *target.slot(*field) = Some((*literal).to_string()),
            Self::Clear(field) => *target.slot(*field) = None,
            Self::ReplaceAll { field, from, to } => {
                if let Some(value) = target.slot(*field).as_mut() {
                    if value.contains(from) {
                        *value = value.replace(from, to);
                    }
                }
            }
            Self::TitleCase(field) => {
                if let Some(value) = target.slot(*field).as_mut() {
                    *value = title_case(value);
                }
            }
        }
    }
}

/// A single conditional rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule<F> {
    /// When the rule fires
    pub when: Condition<F>,
    /// What the rule writes
    pub then: Action<F>,
}

impl<F> OverrideRule<F> {
    /// Create a new rule
    #[must_use]
    pub const fn new(when: Condition<F>, then: Action<F>) -> Self {
        Self { when, then }
    }
}

impl<F: Copy> OverrideRule<F> {
    /// `target := replacement` when `source` equals `literal`
    #[must_use]
    pub fn set_if_equals(source: F, literal: &'static str, target: F, replacement: &'static str) -> Self {
        Self::new(Condition::Equals(source, literal), Action::Set(target, replacement))
    }

    /// Rewrite a field in place from one exact value to another
    #[must_use]
    pub fn rewrite(field: F, from: &'static str, to: &'static str) -> Self {
        Self::set_if_equals(field, from, field, to)
    }

    /// Unconditional, unanchored substring replacement
    #[must_use]
    pub fn replace_substring(field: F, from: &'static str, to: &'static str) -> Self {
        Self::new(Condition::Contains(field, from), Action::ReplaceAll { field, from, to })
    }

    /// Apply the rule if its condition matches; returns whether it fired
    pub fn fire<T: RuleTarget<Field = F>>(&self, target: &mut T) -> bool {
        if self.when.matches(target) {
            self.then.apply(target);
            true
        } else {
            false
        }
    }
}

/// Apply rules to a row in order, each seeing the writes of the previous
/// ones. Returns the number of rules that fired.
pub fn apply_overrides<T: RuleTarget>(target: &mut T, rules: &[OverrideRule<T::Field>]) -> usize {
    rules
        .iter()
        .fold(0, |fired, rule| fired + usize::from(rule.fire(&mut *target)))
}

/// A named, ordered list of override rules
#[derive(Debug, Clone)]
pub struct RuleSet<F> {
    name: &'static str,
    rules: Vec<OverrideRule<F>>,
}

impl<F: Copy + Debug> RuleSet<F> {
    /// Create a rule set from ordered rules
    #[must_use]
    pub fn new(name: &'static str, rules: Vec<OverrideRule<F>>) -> Self {
        Self { name, rules }
    }

    /// Name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The rules, in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[OverrideRule<F>] {
        &self.rules
    }

    /// Apply the rule set to one row
    pub fn apply<T: RuleTarget<Field = F>>(&self, target: &mut T) -> usize {
        apply_overrides(target, &self.rules)
    }

    /// Apply the rule set to every row and log how often each rule fired
    pub fn apply_all<T: RuleTarget<Field = F>>(&self, targets: &mut [T]) -> Vec<usize> {
        let mut counts = vec![0usize; self.rules.len()];
        for target in targets.iter_mut() {
            for (count, rule) in counts.iter_mut().zip(&self.rules) {
                if rule.fire(&mut *target) {
                    *count += 1;
                }
            }
        }

        for (count, rule) in counts.iter().zip(&self.rules) {
            if *count > 0 {
                log::debug!("[{}] {:?} fired on {} rows", self.name, rule.then, count);
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Slot {
        A,
        B,
    }

    #[derive(Debug, Default)]
    struct Pair {
        a: Option<String>,
        b: Option<String>,
    }

    impl RuleTarget for Pair {
        type Field = Slot;

        fn value(&self, field: Slot) -> Option<&str> {
            match field {
                Slot::A => self.a.as_deref(),
                Slot::B => self.b.as_deref(),
            }
        }

        fn slot(&mut self, field: Slot) -> &mut Option<String> {
            match field {
                Slot::A => &mut self.a,
                Slot::B => &mut self.b,
            }
        }
    }

    fn pair(a: Option<&str>, b: Option<&str>) -> Pair {
        Pair {
            a: a.map(str::to_string),
            b: b.map(str::to_string),
        }
    }

    #[test]
    fn test_last_match_wins() {
        let rules = vec![
            OverrideRule::set_if_equals(Slot::A, "x", Slot::B, "first"),
            OverrideRule::set_if_equals(Slot::A, "x", Slot::B, "second"),
        ];
        let mut row = pair(Some("x"), None);
        assert_eq!(apply_overrides(&mut row, &rules), 2);
        assert_eq!(row.b.as_deref(), Some("second"));
    }

    #[test]
    fn test_later_rules_see_earlier_writes() {
        let rules = vec![
            OverrideRule::rewrite(Slot::A, "raw", "clean"),
            OverrideRule::set_if_equals(Slot::A, "clean", Slot::B, "derived"),
        ];
        let mut row = pair(Some("raw"), None);
        apply_overrides(&mut row, &rules);
        assert_eq!(row.a.as_deref(), Some("clean"));
        assert_eq!(row.b.as_deref(), Some("derived"));
    }

    #[test]
    fn test_missing_values_never_compare_equal() {
        let row = pair(None, Some("v"));
        assert!(!Condition::Equals(Slot::A, "").matches(&row));
        assert!(!Condition::Contains(Slot::A, "").matches(&row));
        assert!(Condition::Missing(Slot::A).matches(&row));
        assert!(!Condition::Missing(Slot::B).matches(&row));
    }

    #[test]
    fn test_replace_substring_is_unanchored() {
        let rule = OverrideRule::replace_substring(Slot::A, "China", "Country Medical Affairs");
        let mut row = pair(Some("China Medical"), None);
        assert!(rule.fire(&mut row));
        assert_eq!(row.a.as_deref(), Some("Country Medical Affairs Medical"));

        let mut untouched = pair(None, None);
        assert!(!rule.fire(&mut untouched));
        assert!(untouched.a.is_none());
    }

    #[test]
    fn test_compound_conditions() {
        let both = Condition::All(vec![
            Condition::OneOf(Slot::A, &["UNKNOWN", "EAST EUROPE"]),
            Condition::Equals(Slot::B, "Yes"),
        ]);
        assert!(both.matches(&pair(Some("UNKNOWN"), Some("Yes"))));
        assert!(!both.matches(&pair(Some("UNKNOWN"), Some("No"))));

        let either = Condition::Any(vec![Condition::Missing(Slot::A), Condition::Equals(Slot::A, "n/a")]);
        assert!(either.matches(&pair(None, None)));
        assert!(either.matches(&pair(Some("n/a"), None)));
        assert!(!either.matches(&pair(Some("x"), None)));
    }

    #[test]
    fn test_rule_set_counts() {
        let set = RuleSet::new(
            "test",
            vec![
                OverrideRule::new(Condition::Missing(Slot::A), Action::Set(Slot::A, "default")),
                OverrideRule::new(Condition::Always, Action::TitleCase(Slot::B)),
            ],
        );
        let mut rows = vec![pair(None, Some("hello world")), pair(Some("kept"), None)];
        let counts = set.apply_all(&mut rows);

        assert_eq!(counts, vec![1, 2]);
        assert_eq!(rows[0].a.as_deref(), Some("default"));
        assert_eq!(rows[0].b.as_deref(), Some("Hello World"));
        assert_eq!(rows[1].a.as_deref(), Some("kept"));
        assert_eq!(rows[1].b, None);
    }
}
