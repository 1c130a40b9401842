use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Classification of a rule failure.
///
/// Carried alongside messages inside a validation pass; the public
/// [`ErrorMap`] erases the kind and keeps only the message, since hosts render
/// one message per field regardless of how it was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field missing or empty.
    Presence,
    /// Below minimum or above maximum character count.
    Length,
    /// Fails a declared pattern.
    Format,
    /// Fails a custom predicate (date bounds, date ordering, closed-set
    /// membership, cross-field inconsistency).
    Semantic,
    /// Collection exceeds its maximum item count. Detected by the owning
    /// collaborator, surfaced through the same map shape.
    Cardinality,
}

/// A single rule failure: what went wrong and the message to show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Violation {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Path-keyed error map produced by a validation pass.
///
/// Keys are serialized field paths (`"experiencias.2.periodo_fin"`), values a
/// single message each. A map is rebuilt from scratch on every pass — it is
/// never patched incrementally against a stale map from an earlier pass.
///
/// Serializes to a flat JSON object so server-side errors can be translated
/// into the same shape and pushed through the same formatter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: BTreeMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        ErrorMap::default()
    }

    /// Insert a message for a path, replacing any earlier message for it.
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(path.into(), message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`, later entries winning for shared keys.
    pub fn absorb(&mut self, other: ErrorMap) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(String, String)> for ErrorMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        ErrorMap {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ErrorMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A rule was registered against a path that cannot structurally exist in the
/// declared record shape.
///
/// This is a defect in the rule or path definitions, not user input, so it is
/// raised at engine construction rather than folded into an [`ErrorMap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeError {
    pub pattern: String,
    pub message: String,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pattern, self.message)
    }
}

impl std::error::Error for ShapeError {}
