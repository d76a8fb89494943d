//! Finalized output of one run.

use std::time::Duration;

use serde_json::Value;

use super::key_table::KeyMapping;

/// Per-group mappings produced by one run, groups in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub run_name: String,
    groups: Vec<(String, KeyMapping)>,
}

impl RunResult {
    pub fn new(run_name: impl Into<String>, groups: Vec<(String, KeyMapping)>) -> Self {
        Self {
            run_name: run_name.into(),
            groups,
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &KeyMapping)> {
        self.groups.iter().map(|(name, mapping)| (name.as_str(), mapping))
    }

    pub fn group(&self, name: &str) -> Option<&KeyMapping> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, mapping)| mapping)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of entries across all groups.
    pub fn key_count(&self) -> usize {
        self.groups.iter().map(|(_, mapping)| mapping.len()).sum()
    }

    /// All groups merged into one mapping; later groups win on collision.
    pub fn combined(&self) -> KeyMapping {
        let mut combined = KeyMapping::new();
        for (_, mapping) in &self.groups {
            combined.extend(mapping);
        }
        combined
    }
}

/// Counters collected while a run processes its units, handed to the
/// completion hook with the host's own metadata.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    pub units_seen: usize,
    pub units_skipped: usize,
    pub units_extracted: usize,
    pub units_rewritten: usize,
    pub units_failed: usize,
    pub matches: usize,
    pub elapsed: Duration,
    /// Opaque host metadata, passed through untouched.
    pub host: Value,
}

/// Completion hook invoked once per finished run.
pub type DoneHook = Box<dyn Fn(&RunResult, &RunStats) + Send + Sync>;
