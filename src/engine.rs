//! The assembled validation engine.
//!
//! An [`Engine`] owns a step plan, the group row policies, and the label
//! table, all fixed at construction. Validation borrows the record immutably
//! and builds a fresh [`ErrorMap`] per call, so the engine is re-entrant: a
//! debounced per-field check and a full step-gate check may run over the same
//! record concurrently without shared state.

use crate::collection::{self, GroupPolicy};
use crate::error::{ErrorMap, ShapeError};
use crate::format::{self, LabelTable};
use crate::path::FieldPath;
use crate::rule::REQUIRED_MARKER;
use crate::steps::{Gate, StepPlan};
use serde_json::Value;
use std::collections::BTreeSet;

/// Declared structure of the record the engine validates: which top-level
/// fields exist and which names are repeated groups (at any nesting level).
///
/// Rules are cross-checked against the shape at construction so that a typo
/// in a rule path fails loudly during development instead of silently never
/// firing.
#[derive(Clone, Debug, Default)]
pub struct Shape {
    fields: BTreeSet<String>,
    groups: BTreeSet<String>,
}

impl Shape {
    pub fn new() -> Shape {
        Shape::default()
    }

    /// Declare a top-level scalar field or scalar group.
    pub fn field(mut self, name: &str) -> Shape {
        self.fields.insert(name.to_string());
        self
    }

    /// Declare a repeated group name.
    pub fn group(mut self, name: &str) -> Shape {
        self.groups.insert(name.to_string());
        self
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    fn has_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }
}

/// The validation engine: step plan + row policies + labels + declared shape.
#[derive(Debug)]
pub struct Engine {
    plan: StepPlan,
    policies: Vec<GroupPolicy>,
    labels: LabelTable,
}

impl Engine {
    /// Assemble an engine, cross-checking every rule binding and group policy
    /// against the declared record shape.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] naming the offending pattern when a binding
    /// addresses an undeclared field or group, or when a wildcard fans out
    /// over a name not declared as a group.
    pub fn new(
        plan: StepPlan,
        policies: Vec<GroupPolicy>,
        labels: LabelTable,
        shape: &Shape,
    ) -> Result<Engine, ShapeError> {
        for binding in plan.bindings() {
            let pattern = &binding.pattern;
            let head = pattern.head();
            if !shape.has_field(head) && !shape.has_group(head) {
                return Err(ShapeError {
                    pattern: pattern.as_str().to_string(),
                    message: format!("'{}' is not a declared field or group", head),
                });
            }
            for group in pattern.groups() {
                if !shape.has_group(group) {
                    return Err(ShapeError {
                        pattern: pattern.as_str().to_string(),
                        message: format!("'{}' is not a declared repeated group", group),
                    });
                }
            }
        }
        for policy in &policies {
            if !shape.has_group(&policy.group) {
                return Err(ShapeError {
                    pattern: policy.group.clone(),
                    message: "group policy targets an undeclared repeated group".to_string(),
                });
            }
        }

        Ok(Engine {
            plan,
            policies,
            labels,
        })
    }

    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Validate a record against the rules active for a gate.
    ///
    /// Each binding produces its own partial map; the partials are aggregated
    /// last-writer-wins (always-active rules last) and formatted. The host
    /// permits advancing to the next step only when the current step's gate
    /// comes back empty; retreating never re-validates.
    pub fn validate_gate(&self, record: &Value, gate: Gate) -> ErrorMap {
        if let Gate::Step(n) = gate {
            debug_assert!(
                n >= 1 && n <= self.plan.step_count(),
                "gate step {} outside 1..={}",
                n,
                self.plan.step_count()
            );
        }

        let partials = self.plan.rules_for_gate(gate).map(|binding| {
            let normalized = binding.pattern.normalized();
            let label = self.labels.label_for(&normalized);
            let policy = self.policy_for(binding.pattern.innermost_group());
            collection::apply(record, &binding.pattern, &binding.rule, policy, &label)
        });

        format::format(format::aggregate(partials), &self.labels)
    }

    /// Validate one field for live feedback.
    ///
    /// Runs every binding covering the path — in gate order, regardless of
    /// step — and returns the surviving message, formatted the same way as
    /// step-gate output. `None` means the field is currently valid.
    ///
    /// Asking for a path no binding covers is a rule-definition defect; it
    /// trips a debug assertion and yields `None` in release builds.
    pub fn validate_field(&self, record: &Value, path: &str) -> Option<String> {
        let parsed = FieldPath::parse(path);
        let normalized = parsed.normalized();
        let label = self.labels.label_for(&normalized);

        let mut covered = false;
        let mut last = None;
        for binding in self.plan.bindings_for_path(&normalized) {
            covered = true;
            let policy = self.policy_for(binding.pattern.innermost_group());
            if let Some(v) = collection::check_one(record, &parsed, &binding.rule, policy, &label) {
                last = Some(v.message);
            }
        }
        debug_assert!(covered, "no rule binding covers path '{}'", path);

        last.map(|message| {
            if message == REQUIRED_MARKER {
                format!("Required field: {}", label)
            } else {
                message
            }
        })
    }

    fn policy_for(&self, group: Option<&str>) -> Option<&GroupPolicy> {
        let group = group?;
        self.policies.iter().find(|p| p.group == group)
    }
}
