//! Forward key tables built while scanning, and their finalized inverse.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::FinalizeError;

/// Original key -> assigned key for one group, in first-sight order.
///
/// Once a key is assigned it is never reassigned.
#[derive(Debug, Default, Clone)]
pub struct KeyTable {
    assigned: HashMap<String, String>,
    order: Vec<String>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.assigned.get(original).map(String::as_str)
    }

    /// Record `original -> assigned`. Returns false, leaving the table
    /// untouched, when `original` is already present.
    pub fn insert(&mut self, original: &str, assigned: String) -> bool {
        if self.assigned.contains_key(original) {
            return false;
        }
        self.assigned.insert(original.to_string(), assigned);
        self.order.push(original.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(original, assigned)` pairs in first-sight order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|original| (original.as_str(), self.assigned[original].as_str()))
    }

    /// Invert into assigned -> original. Fails if two originals share an
    /// assigned key.
    pub fn invert(&self, group: &str) -> Result<KeyMapping, FinalizeError> {
        let mut mapping = KeyMapping::new();
        for (original, assigned) in self.iter() {
            if let Some(first) = mapping.get(assigned) {
                return Err(FinalizeError::DuplicateAssignedKey {
                    group: group.to_string(),
                    assigned: assigned.to_string(),
                    first: first.to_string(),
                    second: original.to_string(),
                });
            }
            mapping.insert(assigned, original);
        }
        Ok(mapping)
    }
}

/// Assigned key -> original key, serialized as a flat JSON object of strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyMapping {
    entries: Map<String, Value>,
}

impl KeyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the previous original key.
    pub fn insert(&mut self, assigned: &str, original: &str) -> Option<String> {
        self.entries
            .insert(assigned.to_string(), Value::String(original.to_string()))
            .and_then(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
    }

    pub fn get(&self, assigned: &str) -> Option<&str> {
        self.entries.get(assigned).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }

    /// Merge `other` into `self`; entries of `other` win on collision.
    pub fn extend(&mut self, other: &KeyMapping) {
        for (assigned, original) in other.iter() {
            self.insert(assigned, original);
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl Serialize for KeyMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for KeyMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut mapping = KeyMapping::new();
        for (assigned, original) in iter {
            mapping.insert(assigned, original);
        }
        mapping
    }
}
