//! Grants ledger keyed by grant id

use super::lookup::LookupTable;
use crate::models::budget::{BudgetRecord, BudgetRow};

/// Trimmed grant id to every ledger entry for that grant
pub type BudgetLedger = LookupTable<BudgetRecord>;

/// Join key of the ledger: the grant id or study name, trimmed
#[must_use]
pub fn grant_key(value: &str) -> String {
    value.trim().to_string()
}

/// Build the ledger. Remaining budget is derived here, once per entry.
#[must_use]
pub fn budget_ledger(rows: &[BudgetRow]) -> BudgetLedger {
    let mut table = LookupTable::new("budget ledger");
    for row in rows {
        match BudgetRecord::from_row(row) {
            Some(record) => table.insert(grant_key(&record.grant_id), record),
            None => table.record_dropped(),
        }
    }
    table.log_summary();
    table
}
