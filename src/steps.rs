//! Step-scoped rule activation.
//!
//! A wizard step only enforces the rules bound to it; "submit" enforces the
//! union of every step plus the always-active set. Always-active rules
//! (phone format, date bounds and ordering) run on every gate, because data
//! from earlier steps can change indirectly through shared state. They are
//! iterated after the step-bound rules so a specific late check overrides a
//! generic earlier one for the same path under last-writer-wins aggregation.

use crate::path::PathPattern;
use crate::rule::Rule;

/// What is being validated: one numbered step, or final submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// A wizard step in `1..=step_count`.
    Step(u8),
    /// The union of all steps' rules plus the always-active set.
    Submit,
}

/// One rule bound to a path pattern and an activation scope.
#[derive(Debug)]
pub struct Binding {
    pub pattern: PathPattern,
    pub rule: Rule,
    /// Step the binding belongs to; `None` for always-active bindings.
    pub step: Option<u8>,
}

/// The step-to-rules association for a wizard.
///
/// Built once at engine construction; immutable afterwards, so concurrent
/// validation passes can share it freely.
#[derive(Debug, Default)]
pub struct StepPlan {
    step_count: u8,
    bindings: Vec<Binding>,
}

impl StepPlan {
    pub fn new(step_count: u8) -> StepPlan {
        StepPlan {
            step_count,
            bindings: Vec::new(),
        }
    }

    pub fn step_count(&self) -> u8 {
        self.step_count
    }

    /// Bind a rule to a pattern for one step.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed or the step is out of range — both
    /// are defects in the plan definition, not user input.
    pub fn bind(mut self, step: u8, pattern: &str, rule: Rule) -> StepPlan {
        assert!(
            step >= 1 && step <= self.step_count,
            "step {} outside 1..={}",
            step,
            self.step_count
        );
        self.bindings.push(Binding {
            pattern: parse_pattern(pattern),
            rule,
            step: Some(step),
        });
        self
    }

    /// Bind an always-active rule: it runs on every step gate and on submit.
    pub fn bind_always(mut self, pattern: &str, rule: Rule) -> StepPlan {
        self.bindings.push(Binding {
            pattern: parse_pattern(pattern),
            rule,
            step: None,
        });
        self
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The bindings active for a gate, step-bound rules first, always-active
    /// rules last.
    pub fn rules_for_gate(&self, gate: Gate) -> impl Iterator<Item = &Binding> {
        let stepped = self.bindings.iter().filter(move |b| match (gate, b.step) {
            (Gate::Step(n), Some(s)) => s == n,
            (Gate::Submit, Some(_)) => true,
            (_, None) => false,
        });
        let always = self.bindings.iter().filter(|b| b.step.is_none());
        stepped.chain(always)
    }

    /// All bindings whose pattern covers the given normalized path, in gate
    /// order. Used by single-field validation, which skips step gating.
    pub fn bindings_for_path(&self, normalized: &str) -> impl Iterator<Item = &Binding> {
        let stepped = self
            .bindings
            .iter()
            .filter(move |b| b.step.is_some() && b.pattern.normalized() == normalized);
        let always = self
            .bindings
            .iter()
            .filter(move |b| b.step.is_none() && b.pattern.normalized() == normalized);
        stepped.chain(always)
    }
}

fn parse_pattern(pattern: &str) -> PathPattern {
    match PathPattern::parse(pattern) {
        Some(p) => p,
        None => panic!("malformed path pattern: '{}'", pattern),
    }
}
