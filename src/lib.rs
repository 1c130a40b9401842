//! Step-gated validation engine for multi-step structured-record intake
//! wizards.
//!
//! A wizard edits one nested record (personal data, free text, and repeated
//! groups such as educations or work experiences) across several steps. This
//! crate is the rule engine underneath: declarative per-field rules, dotted/
//! indexed path addressing into the record, cross-field context for rules
//! like date ranges, all-or-nothing row semantics for optional repeated
//! groups, step-scoped rule activation, and path-keyed error maps with one
//! canonical phrasing for missing fields.
//!
//! ```text
//! record + gate → StepPlan → Rule/Collection evaluation → aggregate → format → ErrorMap
//! ```
//!
//! The engine is synchronous and re-entrant: it borrows the record immutably
//! and builds every error map fresh, so a debounced per-field check may run
//! concurrently with a full step-gate pass over the same record.
//!
//! # Quick start
//!
//! ```rust
//! use formgate::{Gate, curriculum_engine};
//! use serde_json::json;
//!
//! let engine = curriculum_engine().expect("catalog shape is consistent");
//!
//! let record = json!({
//!     "datos_personales": { "nombre": "Ana", "apellidos": "Pérez" },
//!     "resumen": ""
//! });
//!
//! let errors = engine.validate_gate(&record, Gate::Step(1));
//! assert_eq!(
//!     errors.get("datos_personales.correo"),
//!     Some("Required field: Correo electrónico")
//! );
//!
//! // Live per-field feedback, same rules, no step gating.
//! assert!(engine.validate_field(&record, "datos_personales.nombre").is_none());
//! assert!(engine.validate_field(&record, "resumen").is_some());
//! ```

pub mod catalog;
pub mod collection;
pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod path;
pub mod rule;
pub mod steps;

pub use engine::{Engine, Shape};
pub use error::{ErrorMap, ShapeError, Violation, ViolationKind};
pub use rule::{REQUIRED_MARKER, Rule, Verdict};
pub use steps::{Gate, StepPlan};

// Re-export the aggregation/formatting entry points at the crate root.
pub use format::{LabelTable, aggregate, format};

/// Convenience entry point: the built-in curriculum wizard engine with the
/// default reference catalogs.
///
/// # Errors
///
/// Returns a [`ShapeError`] only if the built-in rule tables disagree with
/// the declared record shape — a defect in this crate, surfaced loudly rather
/// than swallowed.
pub fn curriculum_engine() -> Result<Engine, ShapeError> {
    catalog::engine(&catalog::Catalogs::default())
}
