//! Country name to country code reference

use super::lookup::LookupTable;
use crate::models::reference::CountryCodeRow;
use crate::utils::text::{optional_key, reference_key};

/// Upper-cased, trimmed country name to code; the first row for a name wins
pub type CountryCodeMapping = LookupTable<Option<String>>;

/// Build the country code mapping
#[must_use]
pub fn country_code_mapping(rows: &[CountryCodeRow]) -> CountryCodeMapping {
    let mut table = LookupTable::new("country code");
    for row in rows {
        match optional_key(row.country.as_deref(), reference_key) {
            Some(key) => {
                table.insert_first(key, row.code.clone());
            }
            None => table.record_dropped(),
        }
    }
    table
}
