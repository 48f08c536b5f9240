//! Two-pass country list tokenizer
//!
//! Catalog country lists are separated by `|`, but a single name may itself
//! contain commas in its ISO form ("KOREA, REPUBLIC OF"). The list is split
//! on `|` first, compound names are corrected, and only then are tokens
//! split on `,`.

use itertools::Itertools;

/// First pass: split on `|`, drop empty tokens, upper-case and de-duplicate
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .unique()
        .collect()
}

/// Second pass: split corrected tokens on `,`, trim, upper-case, drop empty
/// tokens and de-duplicate across the whole list
#[must_use]
pub fn split_names<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .flat_map(|token| {
            token
                .as_ref()
                .split(',')
                .map(|name| name.trim().to_uppercase())
                .collect::<Vec<_>>()
        })
        .filter(|name| !name.is_empty())
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Usa||Korea, Republic Of|USA"),
            vec!["USA", "KOREA, REPUBLIC OF"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_split_names() {
        assert_eq!(
            split_names(["USA, KOREA", " uk ,", "Usa"]),
            vec!["USA", "KOREA", "UK"]
        );
    }
}
