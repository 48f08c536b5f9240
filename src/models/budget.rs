//! Grants budget ledger rows and the remaining-budget derivation

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::models::traits::SourceTable;

/// Remaining budget of a grant, derived from approved and paid amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RemainingBudget {
    /// Less has been paid than was approved
    Yes,
    /// Exactly the approved amount has been paid
    No,
    /// More has been paid than was approved; flagged for review
    Error,
    /// One of the amounts is missing, or the study has no ledger entry
    #[default]
    Unknown,
}

impl RemainingBudget {
    /// Display value written to the output table
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Error => "Error",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RemainingBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RemainingBudget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Compare the paid amount against the approved amount.
///
/// Missing or non-finite amounts give [`RemainingBudget::Unknown`]; an
/// overpayment is reported as [`RemainingBudget::Error`] rather than failing.
#[must_use]
pub fn derive_remaining_budget(approved: Option<f64>, paid: Option<f64>) -> RemainingBudget {
    let (Some(approved), Some(paid)) = (
        approved.filter(|v| v.is_finite()),
        paid.filter(|v| v.is_finite()),
    ) else {
        return RemainingBudget::Unknown;
    };

    if paid < approved {
        RemainingBudget::Yes
    } else if paid > approved {
        RemainingBudget::Error
    } else {
        RemainingBudget::No
    }
}

/// Parse a ledger amount.
///
/// Accepts plain numbers as well as spreadsheet exports with thousands
/// separators or a leading currency symbol. Anything else is missing.
#[must_use]
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Raw row of the grants ledger sheet
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BudgetRow {
    /// Grant identifier, matching the catalog's `NAME`
    #[serde(rename = "GRANT_ID", default)]
    pub grant_id: Option<String>,
    /// Approved amount as exported
    #[serde(rename = "APPROVED_AMOUNT", default)]
    pub approved_amount: Option<String>,
    /// Total paid as exported
    #[serde(rename = "TOTAL_PAID", default)]
    pub total_paid: Option<String>,
}

impl SourceTable for BudgetRow {
    const TABLE_NAME: &'static str = "budget ledger";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["GRANT_ID", "APPROVED_AMOUNT", "TOTAL_PAID"];
}

/// Ledger entry with its remaining budget computed once at load time
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    /// Grant identifier (trimmed)
    pub grant_id: String,
    /// Approved amount
    pub approved_amount: Option<f64>,
    /// Total paid
    pub total_paid: Option<f64>,
    /// Derived remaining budget
    pub remaining_budget: RemainingBudget,
}

impl BudgetRecord {
    /// Build a ledger entry from parsed amounts
    #[must_use]
    pub fn new(grant_id: impl Into<String>, approved: Option<f64>, paid: Option<f64>) -> Self {
        Self {
            grant_id: grant_id.into(),
            approved_amount: approved,
            total_paid: paid,
            remaining_budget: derive_remaining_budget(approved, paid),
        }
    }

    /// Convert a raw ledger row. Rows without a grant id cannot join and
    /// yield `None`.
    #[must_use]
    pub fn from_row(row: &BudgetRow) -> Option<Self> {
        let grant_id = row
            .grant_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;

        let approved = parse_amount(row.approved_amount.as_deref());
        let paid = parse_amount(row.total_paid.as_deref());
        if approved.is_none() && row.approved_amount.is_some() {
            log::warn!("Unparseable APPROVED_AMOUNT for grant {grant_id}");
        }
        if paid.is_none() && row.total_paid.is_some() {
            log::warn!("Unparseable TOTAL_PAID for grant {grant_id}");
        }

        Some(Self::new(grant_id, approved, paid))
    }
}
