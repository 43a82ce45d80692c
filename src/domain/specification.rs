//! Per-product specification table
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::product::CORE_COLUMNS;

/// Prefix given to specification keys that would shadow a core column.
pub const SHADOWED_KEY_PREFIX: &str = "spec_";

/// Storage key for a canonical label; core column names get [`SHADOWED_KEY_PREFIX`].
pub fn column_key(canonical: String) -> String {
    if CORE_COLUMNS.contains(&canonical.as_str()) {
        format!("{SHADOWED_KEY_PREFIX}{canonical}")
    } else {
        canonical
    }
}

/// Canonical key → display value, ordered by key.
///
/// Insertion is last-write-wins, so when two source labels collapse to the
/// same canonical key the later row keeps its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecificationSet(BTreeMap<String, String>);

impl SpecificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value that was replaced, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy holding exactly the keys of `union`, with empty values for keys this set lacks.
    pub fn conformed(&self, union: &BTreeSet<String>) -> Self {
        Self(
            union
                .iter()
                .map(|key| (key.clone(), self.0.get(key).cloned().unwrap_or_default()))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for SpecificationSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}
