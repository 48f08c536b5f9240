//! Text normalization helpers
//!
//! Lookup keys on both sides of every join go through the same helper, so a
//! crosswalk row and a catalog row match if and only if their keys agree
//! after normalization.

/// Title-case a string word by word.
///
/// A cased character following another cased character is lower-cased, any
/// other cased character is upper-cased. Digits, punctuation and whitespace
/// break words, so `"on-hold"` becomes `"On-Hold"` and `"1st"` becomes `"1St"`.
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_cased = false;
    for ch in value.chars() {
        let cased = ch.is_uppercase() || ch.is_lowercase();
        if cased {
            if previous_cased {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
        } else {
            out.push(ch);
        }
        previous_cased = cased;
    }
    out
}

/// Trim and title-case; the normalization applied to status values
#[must_use]
pub fn normalize_status(value: &str) -> String {
    title_case(value.trim())
}

/// Trim and upper-case; the normalization key of asset, category and
/// country lookups
#[must_use]
pub fn reference_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Convert an optional cell into a lookup key, treating blank text as missing
#[must_use]
pub fn optional_key(value: Option<&str>, normalize: fn(&str) -> String) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(normalize)
}
