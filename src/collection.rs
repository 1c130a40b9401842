//! Validation of repeated groups (dynamic lists of sub-records).
//!
//! Two policies matter here. Optional-row groups (references, languages,
//! skills) follow all-or-nothing semantics: a row whose fields are all empty
//! is exempt from every required check, and the moment any field is non-empty
//! the group's required-within-row set becomes mandatory for that row only.
//! Maximum cardinality is enforced by the owning collaborator before rows
//! reach the validator; [`cardinality_error`] only shapes the over-limit
//! message so it flows through the same map and formatter as everything else.

use crate::context;
use crate::error::{ErrorMap, Violation, ViolationKind};
use crate::path::{FieldPath, PathPattern, get};
use crate::rule::{Rule, is_empty};
use serde_json::Value;

/// Row policy for one repeated group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPolicy {
    /// Group name; matched against the innermost wildcard of a pattern.
    pub group: String,
    /// Whether fully-empty rows are exempt from required checks.
    pub optional_rows: bool,
    /// Fields that become mandatory once any field in the row is non-empty.
    /// Only consulted for optional-row groups.
    pub required_within_row: Vec<String>,
}

impl GroupPolicy {
    /// A group whose rows are always subject to their rules as declared.
    pub fn mandatory(group: &str) -> GroupPolicy {
        GroupPolicy {
            group: group.to_string(),
            optional_rows: false,
            required_within_row: Vec::new(),
        }
    }

    /// An all-or-nothing group: empty rows pass, non-empty rows must fill
    /// the `required` field set.
    pub fn optional(group: &str, required: &[&str]) -> GroupPolicy {
        GroupPolicy {
            group: group.to_string(),
            optional_rows: true,
            required_within_row: required.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Whether every scalar field of a row is empty.
///
/// This is the exemption probe for all-or-nothing rows; it is public so hosts
/// can drive "confirm deletion of a non-empty row" dialogs off the same
/// definition of emptiness the validator uses. Nested collections count as
/// empty only when they contain no rows at all.
pub fn row_is_empty(row: &Value) -> bool {
    match row {
        Value::Null => true,
        Value::Object(map) => map.values().all(row_is_empty),
        Value::Array(items) => items.is_empty(),
        other => is_empty(Some(other)),
    }
}

/// Apply one rule, bound through `pattern`, to every matching location of a
/// record. Returns the raw (unformatted) errors keyed by concrete path.
///
/// `policy` is the row policy of the pattern's innermost group, if any. For
/// optional-row groups the rule's own required flag is ignored in favor of the
/// policy's required-within-row set.
pub fn apply(
    record: &Value,
    pattern: &PathPattern,
    rule: &Rule,
    policy: Option<&GroupPolicy>,
    label: &str,
) -> ErrorMap {
    let mut map = ErrorMap::new();

    for path in pattern.expand(record) {
        if let Some(v) = check_one(record, &path, rule, policy, label) {
            map.insert(path.to_string(), v.message);
        }
    }

    map
}

/// Evaluate one concrete path under the owning row's policy.
pub fn check_one(
    record: &Value,
    path: &FieldPath,
    rule: &Rule,
    policy: Option<&GroupPolicy>,
    label: &str,
) -> Option<Violation> {
    let value = get(record, path);
    let ctx = context::siblings(record, path, rule.context_keys());

    if let Some(policy) = policy
        && policy.optional_rows
    {
        let row = get(record, &path.parent());
        if row.is_none_or(row_is_empty) {
            // Exempt row: no checks run at all.
            return None;
        }
        let field_required = path
            .last_key()
            .is_some_and(|f| policy.required_within_row.iter().any(|r| r == f));
        return rule.evaluate_as(field_required, value, label, &ctx);
    }

    rule.evaluate(value, label, &ctx)
}

/// Canonical over-limit failure for a repeated group, as a `(path, violation)`
/// pair the host merges through the aggregator.
///
/// The limit itself is checked by the collaborator that owns row insertion;
/// the engine only guarantees the message shares the ErrorMap shape.
pub fn cardinality_error(group_path: &str, max: usize, label: &str) -> (String, Violation) {
    (
        group_path.to_string(),
        Violation::new(
            ViolationKind::Cardinality,
            format!("{} allows at most {} entries", label, max),
        ),
    )
}
