//! Flat key/value mapping produced by flattening a variable document

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::placeholder::placeholders;

/// Flat variable mapping
///
/// Iteration follows first-insertion order; re-inserting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatMapping(IndexMap<String, String>);

/// A placeholder that still references a missing key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Variable whose value contains the placeholder
    pub key: String,
    /// The missing key
    pub missing: String,
}

impl FlatMapping {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a value, returning the one it replaced
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

    pub fn keys(&self) -> impl Iterator<Item = &str> + Clone {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the inner map
    pub fn inner(&self) -> &IndexMap<String, String> {
        &self.0
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }

    /// Check that no value references a key present in the mapping
    pub fn is_resolved(&self) -> bool {
        self.0
            .values()
            .all(|value| placeholders(value).all(|p| !self.contains_key(p.key)))
    }

    /// Placeholders left in values because their key is not defined
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for (key, value) in &self.0 {
            for placeholder in placeholders(value) {
                if !self.contains_key(placeholder.key) {
                    dangling.push(DanglingReference {
                        key: key.clone(),
                        missing: placeholder.key.to_string(),
                    });
                }
            }
        }
        dangling
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = FlatMapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a FlatMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
