//! Keyed lookup table shared by all reference mappings

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::utils::text::optional_key;

/// Values stored under one key; most keys map to a single value
pub type Matches<V> = SmallVec<[V; 1]>;

/// Immutable key to value(s) mapping built once from a reference table.
///
/// Keys are normalized by the builder before insertion, and lookups must
/// apply the same normalization. Rows whose key is blank are not inserted;
/// they are only counted.
#[derive(Debug, Clone)]
pub struct LookupTable<V> {
    name: &'static str,
    entries: FxHashMap<String, Matches<V>>,
    dropped_rows: usize,
    duplicate_keys: usize,
}

impl<V> LookupTable<V> {
    /// Create an empty table
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: FxHashMap::default(),
            dropped_rows: 0,
            duplicate_keys: 0,
        }
    }

    /// Add a value under a key, keeping any values already stored there
    pub fn insert(&mut self, key: String, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Add a value only if the key is not present yet.
    ///
    /// Returns `false` and counts a duplicate when the key already exists.
    pub fn insert_first(&mut self, key: String, value: V) -> bool {
        match self.entries.get(&key) {
            Some(_) => {
                self.duplicate_keys += 1;
                false
            }
            None => {
                self.entries.insert(key, smallvec::smallvec![value]);
                true
            }
        }
    }

    /// Record a source row that was skipped because its key was blank
    pub fn record_dropped(&mut self) {
        self.dropped_rows += 1;
    }

    /// All values for an already-normalized key; empty when unmatched
    #[must_use]
    pub fn get(&self, key: &str) -> &[V] {
        self.entries
            .get(key)
            .map(|values| values.as_slice())
            .unwrap_or_default()
    }

    /// First value for an already-normalized key
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&V> {
        self.get(key).first()
    }

    /// Normalize a raw cell and look it up. Missing or blank cells never match.
    #[must_use]
    pub fn lookup(&self, raw: Option<&str>, normalize: fn(&str) -> String) -> &[V] {
        optional_key(raw, normalize)
            .map(|key| self.get(&key))
            .unwrap_or_default()
    }

    /// Table name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source rows skipped for a blank key
    #[must_use]
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Source rows ignored because their key was already mapped
    #[must_use]
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }

    /// Log table size and any dropped or duplicate source rows
    pub fn log_summary(&self) {
        log::info!("Resolved {} reference with {} keys", self.name, self.len());
        if self.dropped_rows > 0 {
            log::warn!(
                "Dropped {} {} rows with a blank key",
                self.dropped_rows,
                self.name
            );
        }
        if self.duplicate_keys > 0 {
            log::warn!(
                "Ignored {} {} rows whose key was already mapped",
                self.duplicate_keys,
                self.name
            );
        }
    }
}
