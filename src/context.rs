//! Sibling-value bags for cross-field rules.
//!
//! A date-range rule on `periodo_fin` needs `periodo_inicio` from the same
//! row. Rather than letting rules read the record, the engine resolves the
//! declared sibling keys from the row that owns the validated path and hands
//! them to the predicate as an explicit [`Context`] — every rule stays
//! independently testable with a hand-built bag.

use crate::path::{FieldPath, get};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named sibling values supplied to a cross-field predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Context {
        self.values.insert(key.into(), value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value under `key` as trimmed text, or `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        let s = self.values.get(key)?.as_str()?.trim();
        if s.is_empty() { None } else { Some(s) }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolve the sibling values named by `keys` from the row owning `path`.
///
/// The owning row is the record node one segment above the path; for a
/// top-level field that is the record itself. Missing siblings are simply
/// absent from the bag.
pub fn siblings(record: &Value, path: &FieldPath, keys: &[String]) -> Context {
    let mut ctx = Context::new();
    if keys.is_empty() {
        return ctx;
    }

    let parent = path.parent();
    let Some(row) = get(record, &parent) else {
        return ctx;
    };
    let Some(obj) = row.as_object() else {
        return ctx;
    };

    for key in keys {
        if let Some(v) = obj.get(key) {
            ctx.insert(key.clone(), v.clone());
        }
    }
    ctx
}

