use formgate::{ErrorMap, aggregate};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_entries() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map("[a-c]\\.[a-c]", "[a-z]{1,6}", 0..6)
}

fn to_map(entries: &BTreeMap<String, String>) -> ErrorMap {
    entries
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

proptest! {
    /// Every key of every input survives aggregation, and the value is the
    /// one from the last map containing that key.
    #[test]
    fn last_writer_wins(maps in proptest::collection::vec(arb_entries(), 0..5)) {
        let merged = aggregate(maps.iter().map(to_map));

        let mut expected: BTreeMap<&str, &str> = BTreeMap::new();
        for m in &maps {
            for (k, v) in m {
                expected.insert(k, v);
            }
        }

        prop_assert_eq!(merged.len(), expected.len());
        for (k, v) in expected {
            prop_assert_eq!(merged.get(k), Some(v));
        }
    }

    /// Aggregation over maps with disjoint keys is order-independent.
    #[test]
    fn disjoint_maps_commute(a in arb_entries(), b in arb_entries()) {
        let b: BTreeMap<String, String> = b
            .into_iter()
            .map(|(k, v)| (format!("x.{}", k), v))
            .collect();

        let forward = aggregate([to_map(&a), to_map(&b)]);
        let backward = aggregate([to_map(&b), to_map(&a)]);
        prop_assert_eq!(forward, backward);
    }
}
