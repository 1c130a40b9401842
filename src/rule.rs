//! The declarative rule model for one scalar field.
//!
//! Checks run in a fixed order — required, length bounds, pattern, custom
//! predicate — and short-circuit on the first failure, so a pass yields at
//! most one message per field. Textual values are trimmed for the checks only;
//! the stored value is never touched.

use crate::context::Context;
use crate::error::{Violation, ViolationKind};
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Sentinel message for presence failures.
///
/// Every validator that detects a missing required value emits this marker
/// instead of prose; the formatter rewrites it into the single canonical
/// phrasing keyed by the field label. This keeps "missing field" wording
/// identical across independently-authored rules.
pub const REQUIRED_MARKER: &str = "\u{1}required\u{1}";

/// Outcome of a custom predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Failed; the generic "invalid value" message applies.
    Fail,
    /// Failed with a specific message that overrides the generic one.
    Message(String),
}

type Predicate = Box<dyn Fn(&Value, &Context) -> Verdict + Send + Sync>;

/// A declarative constraint on one scalar field.
///
/// Built with the fluent constructors below; evaluated via [`Rule::evaluate`].
/// Rules hold no structural knowledge of the record — cross-field checks
/// receive their counterpart values through the [`Context`] bag.
#[derive(Default)]
pub struct Rule {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    validate: Option<Predicate>,
    context_keys: Vec<String>,
}

impl Rule {
    pub fn new() -> Rule {
        Rule::default()
    }

    pub fn required(mut self) -> Rule {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Rule {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Rule {
        self.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, re: Regex) -> Rule {
        self.pattern = Some(re);
        self
    }

    pub fn validate<F>(mut self, predicate: F) -> Rule
    where
        F: Fn(&Value, &Context) -> Verdict + Send + Sync + 'static,
    {
        self.validate = Some(Box::new(predicate));
        self
    }

    /// Declare the sibling fields the custom predicate needs. The engine
    /// resolves them from the row that owns the validated path and passes
    /// them in as the predicate's [`Context`].
    pub fn with_context(mut self, keys: &[&str]) -> Rule {
        self.context_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn context_keys(&self) -> &[String] {
        &self.context_keys
    }

    /// Evaluate the rule against a raw value.
    ///
    /// Returns `None` on success. `label` is the display name used in
    /// generated messages; presence failures carry [`REQUIRED_MARKER`] instead
    /// and are labeled later by the formatter.
    pub fn evaluate(&self, raw: Option<&Value>, label: &str, ctx: &Context) -> Option<Violation> {
        self.evaluate_as(self.required, raw, label, ctx)
    }

    /// Evaluate with the required flag overridden.
    ///
    /// The collection validator uses this to apply a group's
    /// required-within-row policy without rebuilding the rule.
    pub fn evaluate_as(
        &self,
        required: bool,
        raw: Option<&Value>,
        label: &str,
        ctx: &Context,
    ) -> Option<Violation> {
        // Trim textual values for the checks only.
        let tested = raw.map(|v| match v {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        });

        if is_empty(tested.as_ref()) {
            if required {
                return Some(Violation::new(ViolationKind::Presence, REQUIRED_MARKER));
            }
            // Optional and absent is valid; no further checks run.
            return None;
        }
        let tested = tested.unwrap();

        if let Some(text) = tested.as_str() {
            let count = text.chars().count();
            if let Some(min) = self.min_length
                && count < min
            {
                return Some(Violation::new(
                    ViolationKind::Length,
                    format!("{} must have at least {} characters", label, min),
                ));
            }
            if let Some(max) = self.max_length
                && count > max
            {
                return Some(Violation::new(
                    ViolationKind::Length,
                    format!("{} must have at most {} characters", label, max),
                ));
            }
            if let Some(re) = &self.pattern
                && !re.is_match(text)
            {
                return Some(Violation::new(
                    ViolationKind::Format,
                    format!("{} has an invalid format", label),
                ));
            }
        }

        if let Some(predicate) = &self.validate {
            match predicate(&tested, ctx) {
                Verdict::Pass => {}
                Verdict::Fail => {
                    return Some(Violation::new(
                        ViolationKind::Semantic,
                        format!("{} has an invalid value", label),
                    ));
                }
                Verdict::Message(msg) => {
                    return Some(Violation::new(ViolationKind::Semantic, msg));
                }
            }
        }

        None
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("validate", &self.validate.is_some())
            .field("context_keys", &self.context_keys)
            .finish()
    }
}

/// Emptiness as the rule model sees it: absent, null, or a string that is
/// empty after trimming. Numbers and booleans are always present.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
