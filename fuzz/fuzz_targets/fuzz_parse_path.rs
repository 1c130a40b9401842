#![no_main]

use formgate::path::{FieldPath, normalize};
use libfuzzer_sys::fuzz_target;

// Path parsing must be total: any string parses, round-trips through
// display for well-formed inputs, and normalizes idempotently.
fuzz_target!(|data: &str| {
    let path = FieldPath::parse(data);
    let serialized = path.to_string();

    let reparsed = FieldPath::parse(&serialized);
    assert_eq!(reparsed.to_string(), serialized);

    let once = normalize(data);
    assert_eq!(normalize(&once), once);
});
