#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use formgate::path::{PathPattern, get};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

/// Generate a simple arbitrary JSON value from fuzzer bytes.
fn arbitrary_value(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Value> {
    if depth == 0 {
        return Ok(Value::Null);
    }
    match u.int_in_range(0..=4)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => Ok(Value::String(String::arbitrary(u)?)),
        3 => {
            let len = u.int_in_range(0..=4)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Array(arr))
        }
        _ => {
            let len = u.int_in_range(0..=4)?;
            let mut map = serde_json::Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(u)?, arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Object(map))
        }
    }
}

// Pattern parsing and expansion must never panic, and every expanded path
// must resolve against the record it was expanded from (or address a
// null placeholder for literal tails).
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(pattern_text) = String::arbitrary(&mut u) else {
        return;
    };
    let Ok(record) = arbitrary_value(&mut u, 4) else {
        return;
    };

    if let Some(pattern) = PathPattern::parse(&pattern_text) {
        for path in pattern.expand(&record) {
            let _ = get(&record, &path);
        }
        let _ = pattern.normalized();
    }
});
