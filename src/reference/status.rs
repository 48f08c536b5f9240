//! Status crosswalk

use itertools::Itertools;

use super::lookup::LookupTable;
use crate::models::reference::StatusRow;
use crate::utils::text::{normalize_status, optional_key};

/// Harmonized status and detail for one native status value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HarmonizedStatus {
    pub status: Option<String>,
    pub detail: Option<String>,
}

/// Native status to harmonized (status, detail) pair.
///
/// Native and harmonized status values are trimmed and title-cased, and
/// exact duplicate rows are removed before the mapping is built. If the same
/// native value still maps to different pairs, the first row wins.
#[derive(Debug, Clone)]
pub struct StatusMapping {
    table: LookupTable<HarmonizedStatus>,
}

impl StatusMapping {
    /// Build the mapping from crosswalk rows
    #[must_use]
    pub fn from_rows(rows: &[StatusRow]) -> Self {
        let mut table = LookupTable::new("status");

        let normalized = rows
            .iter()
            .map(|row| {
                (
                    optional_key(row.status_native.as_deref(), normalize_status),
                    HarmonizedStatus {
                        status: optional_key(row.harmonized_status.as_deref(), normalize_status),
                        detail: row.harmonized_status_detail.clone(),
                    },
                )
            })
            .unique();

        for (native, harmonized) in normalized {
            match native {
                Some(native) => {
                    table.insert_first(native, harmonized);
                }
                None => table.record_dropped(),
            }
        }

        Self { table }
    }

    /// Look up an already-normalized native status
    #[must_use]
    pub fn resolve(&self, native: &str) -> Option<&HarmonizedStatus> {
        self.table.first(native)
    }

    /// Underlying lookup table
    #[must_use]
    pub fn table(&self) -> &LookupTable<HarmonizedStatus> {
        &self.table
    }
}
