use formgate::path::{FieldPath, get, normalize, set};
use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for dotted/indexed paths: keys interleaved with small indices.
fn arb_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z][a-z0-9_]{0,6}".prop_map(|k| k),
            (0usize..4).prop_map(|i| i.to_string()),
        ],
        1..5,
    )
    .prop_map(|segs| segs.join("."))
}

/// Strategy for key-only paths (no indices), which resolve against objects.
fn arb_key_path() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z][a-z0-9_]{0,6}", 1..5).prop_map(|segs| segs.join("."))
}

proptest! {
    /// Parse → display round-trips every path.
    #[test]
    fn parse_display_roundtrip(path in arb_path()) {
        prop_assert_eq!(FieldPath::parse(&path).to_string(), path);
    }

    /// Normalization removes exactly the numeric segments and is idempotent.
    #[test]
    fn normalization_is_idempotent(path in arb_path()) {
        let once = normalize(&path);
        prop_assert!(once.split('.').all(|s| s.is_empty() || s.parse::<usize>().is_err()));
        prop_assert_eq!(normalize(&once), once.clone());
    }

    /// A value written with `set` is read back by `get`, and the input record
    /// is never mutated.
    #[test]
    fn set_then_get(path in arb_key_path(), text in "[a-z]{0,8}") {
        let record = json!({ "existing": { "field": "kept" } });
        let before = record.clone();
        let parsed = FieldPath::parse(&path);

        let updated = set(&record, &parsed, Value::String(text.clone()));

        prop_assert_eq!(record, before);
        prop_assert_eq!(get(&updated, &parsed), Some(&Value::String(text)));
    }

    /// Resolution never panics, whatever the path.
    #[test]
    fn get_is_total(path in arb_path()) {
        let record = json!({
            "a": { "b": [ { "c": 1 }, { "c": 2 } ] },
            "x": [1, 2, 3]
        });
        let _ = get(&record, &FieldPath::parse(&path));
    }
}
