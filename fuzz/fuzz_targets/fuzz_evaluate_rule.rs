#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use formgate::context::Context;
use formgate::rule::{REQUIRED_MARKER, Rule};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fn arbitrary_scalar(u: &mut Unstructured<'_>) -> arbitrary::Result<Option<Value>> {
    Ok(match u.int_in_range(0..=4)? {
        0 => None,
        1 => Some(Value::Null),
        2 => Some(Value::Bool(bool::arbitrary(u)?)),
        3 => Some(Value::String(String::arbitrary(u)?)),
        _ => Some(Value::from(i64::arbitrary(u)?)),
    })
}

// Rule evaluation must be total over arbitrary scalars and bounds, and the
// required marker must only ever appear for empty values.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(value) = arbitrary_scalar(&mut u) else {
        return;
    };
    let Ok(required) = bool::arbitrary(&mut u) else {
        return;
    };
    let Ok(min) = u.int_in_range(0usize..=64) else {
        return;
    };
    let Ok(max) = u.int_in_range(0usize..=64) else {
        return;
    };

    let mut rule = Rule::new().min_length(min).max_length(max);
    if required {
        rule = rule.required();
    }

    let outcome = rule.evaluate(value.as_ref(), "Field", &Context::new());

    if let Some(v) = outcome
        && v.message == REQUIRED_MARKER
    {
        assert!(required, "marker emitted for a non-required rule");
        assert!(formgate::rule::is_empty(value.as_ref()));
    }
});
