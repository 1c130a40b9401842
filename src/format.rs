//! Error aggregation and message formatting.
//!
//! Aggregation merges the partial maps of independently-computed concerns
//! (base field rules, phone-pattern overrides, date-range checks, collection
//! membership) with last-writer-wins per key. Formatting rewrites every
//! presence marker into the one canonical phrasing, labeled via the static
//! label table; all other messages pass through untouched. Formatting is
//! idempotent — running an already-formatted map through again is a no-op.

use crate::error::ErrorMap;
use crate::path::{fallback_label, normalize};
use crate::rule::REQUIRED_MARKER;
use std::collections::BTreeMap;

/// Static mapping from normalized path to display label, supplied by the
/// host application. Read-only configuration as far as the engine goes.
#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    entries: BTreeMap<String, String>,
}

impl LabelTable {
    pub fn new() -> LabelTable {
        LabelTable::default()
    }

    /// Register a label under a normalized path key.
    pub fn with(mut self, normalized_path: &str, label: &str) -> LabelTable {
        self.entries
            .insert(normalized_path.to_string(), label.to_string());
        self
    }

    pub fn lookup(&self, normalized_path: &str) -> Option<&str> {
        self.entries.get(normalized_path).map(String::as_str)
    }

    /// Display label for any serialized path: normalize, look up, and fall
    /// back to a title-cased last segment when no entry exists.
    pub fn label_for(&self, path: &str) -> String {
        let normalized = normalize(path);
        match self.lookup(&normalized) {
            Some(label) => label.to_string(),
            None => fallback_label(path),
        }
    }
}

/// Merge partial error maps into one, later maps overriding earlier ones for
/// the same key. Distinct keys are order-independent.
pub fn aggregate(maps: impl IntoIterator<Item = ErrorMap>) -> ErrorMap {
    let mut merged = ErrorMap::new();
    for map in maps {
        merged.absorb(map);
    }
    merged
}

/// Rewrite presence markers into `Required field: {label}`; pass every other
/// message through unchanged.
pub fn format(map: ErrorMap, labels: &LabelTable) -> ErrorMap {
    map.into_iter()
        .map(|(path, message)| {
            if message == REQUIRED_MARKER {
                let label = labels.label_for(&path);
                (path, format!("Required field: {}", label))
            } else {
                (path, message)
            }
        })
        .collect()
}
