//! Path addressing into nested record trees.
//!
//! A field path alternates record keys and zero-based indices
//! (`experiencias.2.periodo_fin`). Resolution is tolerant: a missing key, a
//! missing collection, or an index past the end all yield "no value" rather
//! than an error. Mutation never happens in place — [`set`] returns a fresh
//! record and leaves its input untouched.

use serde_json::Value;
use std::fmt;

static NULL: Value = Value::Null;

// ─── Field paths ────────────────────────────────────────────────────────────

/// One step of a field path: a record key or a collection index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed structural address into a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a dotted/indexed path string. Purely-numeric segments become
    /// indices; everything else is a key. The empty string is the root path.
    pub fn parse(path: &str) -> FieldPath {
        if path.is_empty() {
            return FieldPath { segments: vec![] };
        }
        let segments = path
            .split('.')
            .map(|seg| match seg.parse::<usize>() {
                Ok(i) => Segment::Index(i),
                Err(_) => Segment::Key(seg.to_string()),
            })
            .collect();
        FieldPath { segments }
    }

    /// Build a path from already-parsed segments.
    pub fn from_segments(segments: Vec<Segment>) -> FieldPath {
        FieldPath { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Final key segment, if the path ends on one.
    pub fn last_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Key(k)) => Some(k.as_str()),
            _ => None,
        }
    }

    /// Path of the containing node (this path minus its final segment).
    pub fn parent(&self) -> FieldPath {
        let cut = self.segments.len().saturating_sub(1);
        FieldPath {
            segments: self.segments[..cut].to_vec(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// First key segment, if any. Used for shape checks against declared
    /// top-level fields and groups.
    pub fn head_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Key(k)) => Some(k.as_str()),
            _ => None,
        }
    }

    /// Canonical dotted form with indices removed
    /// (`experiencias.2.periodo_fin` → `experiencias.periodo_fin`).
    ///
    /// This is the key into the static field-label table: every row of a
    /// repeated group shares one label.
    pub fn normalized(&self) -> String {
        let keys: Vec<&str> = self
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Key(k) => Some(k.as_str()),
                Segment::Index(_) => None,
            })
            .collect();
        keys.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match seg {
                Segment::Key(k) => f.write_str(k)?,
                Segment::Index(n) => write!(f, "{}", n)?,
            }
        }
        Ok(())
    }
}

/// Strip index segments from an already-serialized path string without
/// constructing a [`FieldPath`].
pub fn normalize(path: &str) -> String {
    FieldPath::parse(path).normalized()
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Resolve a path against a record.
///
/// Returns the value at the path, or `None` if any segment fails to resolve.
/// The root path resolves to the record itself.
pub fn get<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = record;
    for seg in &path.segments {
        current = match seg {
            Segment::Key(k) => current.as_object()?.get(k)?,
            Segment::Index(i) => current.as_array()?.get(*i)?,
        };
    }
    Some(current)
}

/// Parse-then-resolve convenience for callers holding a path string.
pub fn get_at<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    get(record, &FieldPath::parse(path))
}

/// Return a new record with `value` placed at `path`.
///
/// Only the chain of containers along the path is rebuilt; the input record is
/// never mutated. Missing intermediate objects are created, and an index past
/// the end of a collection pads the collection with nulls up to that index.
pub fn set(record: &Value, path: &FieldPath, value: Value) -> Value {
    set_inner(record, &path.segments, value)
}

fn set_inner(current: &Value, segments: &[Segment], value: Value) -> Value {
    let (seg, rest) = match segments.split_first() {
        Some(pair) => pair,
        None => return value,
    };
    match seg {
        Segment::Key(k) => {
            let mut map = current.as_object().cloned().unwrap_or_default();
            let child = map.get(k).cloned().unwrap_or(Value::Null);
            map.insert(k.clone(), set_inner(&child, rest, value));
            Value::Object(map)
        }
        Segment::Index(i) => {
            let mut arr = current.as_array().cloned().unwrap_or_default();
            while arr.len() <= *i {
                arr.push(Value::Null);
            }
            let child = arr[*i].clone();
            arr[*i] = set_inner(&child, rest, value);
            Value::Array(arr)
        }
    }
}

// ─── Labels ─────────────────────────────────────────────────────────────────

/// Fallback display label for a path with no label-table entry: the last
/// segment, title-cased, with `_` and `-` separators replaced by spaces
/// (`periodo_fin` → `Periodo Fin`).
pub fn fallback_label(path: &str) -> String {
    let last = normalize(path);
    let last = last.rsplit('.').next().unwrap_or("");
    last.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Path patterns ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
struct PatternSegment {
    name: String,
    wildcard: bool,
}

/// A rule-attachment pattern: a literal field path, or a wildcard over the
/// items of one or more repeated groups (`educaciones[*].titulo`,
/// `experiencias[*].funciones[*].descripcion`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parse a pattern string. Returns `None` for malformed bracket syntax
    /// (anything other than `[*]` immediately followed by `.` or end).
    pub fn parse(pattern: &str) -> Option<PathPattern> {
        if pattern.is_empty() {
            return None;
        }
        let mut segments = Vec::new();
        let mut current = String::new();
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    if current.is_empty() {
                        return None; // leading or doubled dot
                    }
                    segments.push(PatternSegment {
                        name: current.clone(),
                        wildcard: false,
                    });
                    current.clear();
                    i += 1;
                }
                '[' => {
                    if current.is_empty() {
                        return None;
                    }
                    if i + 2 < chars.len() && chars[i + 1] == '*' && chars[i + 2] == ']' {
                        segments.push(PatternSegment {
                            name: current.clone(),
                            wildcard: true,
                        });
                        current.clear();
                        i += 3;
                        match chars.get(i) {
                            Some('.') => i += 1,
                            None => {}
                            Some(_) => return None,
                        }
                    } else {
                        return None;
                    }
                }
                c => {
                    current.push(c);
                    i += 1;
                }
            }
        }
        if !current.is_empty() {
            segments.push(PatternSegment {
                name: current,
                wildcard: false,
            });
        } else if segments.last().is_none_or(|s| !s.wildcard) {
            return None; // trailing dot
        }

        Some(PathPattern {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern fans out over a repeated group.
    pub fn is_wildcard(&self) -> bool {
        self.segments.iter().any(|s| s.wildcard)
    }

    /// First segment name. Used for shape checks.
    pub fn head(&self) -> &str {
        &self.segments[0].name
    }

    /// Names of the wildcard (repeated-group) segments, outermost first.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.wildcard)
            .map(|s| s.name.as_str())
    }

    /// Name of the innermost repeated group the pattern fans out over; the
    /// key for group-policy lookup.
    pub fn innermost_group(&self) -> Option<&str> {
        self.groups().last()
    }

    /// Canonical dotted form with `[*]` markers removed; the label-table key
    /// shared by every path the pattern expands to.
    pub fn normalized(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Expand the pattern against a record into the concrete field paths of
    /// every current item.
    ///
    /// A literal pattern expands to its single path whether or not the record
    /// currently holds a value there. A wildcard over a missing or empty
    /// collection expands to nothing.
    pub fn expand(&self, record: &Value) -> Vec<FieldPath> {
        let mut paths: Vec<(Vec<Segment>, &Value)> = vec![(Vec::new(), record)];

        for seg in &self.segments {
            let mut next = Vec::new();
            for (prefix, val) in &paths {
                if seg.wildcard {
                    let target = val.as_object().and_then(|o| o.get(&seg.name));
                    let Some(arr) = target.and_then(Value::as_array) else {
                        continue;
                    };
                    for (i, item) in arr.iter().enumerate() {
                        let mut p = prefix.clone();
                        p.push(Segment::Key(seg.name.clone()));
                        p.push(Segment::Index(i));
                        next.push((p, item));
                    }
                } else {
                    let mut p = prefix.clone();
                    p.push(Segment::Key(seg.name.clone()));
                    let child = val
                        .as_object()
                        .and_then(|o| o.get(&seg.name))
                        .unwrap_or(&NULL);
                    next.push((p, child));
                }
            }
            paths = next;
        }

        paths
            .into_iter()
            .map(|(segments, _)| FieldPath { segments })
            .collect()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
