//! Label to instruction pointer lookup for manually specified edges.

use std::collections::HashMap;

/// Maps each label to the first IP that produced it
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    by_label: HashMap<String, u64>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `label -> ip` unless the label is already taken.
    /// Returns whether the entry was stored.
    pub fn insert_first(&mut self, label: &str, ip: u64) -> bool {
        if self.by_label.contains_key(label) {
            return false;
        }
        self.by_label.insert(label.to_string(), ip);
        true
    }

    pub fn resolve(&self, label: &str) -> Option<u64> {
        self.by_label.get(label).copied()
    }

    /// Number of distinct labels
    pub fn label_count(&self) -> usize {
        self.by_label.len()
    }
}
