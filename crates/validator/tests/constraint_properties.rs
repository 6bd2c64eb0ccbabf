//! Property-based tests for routeguard-validator.

use proptest::prelude::*;
use routeguard_validator::{Constraint, Violation};
use serde_json::{Value, json};

// ============================================================================
// CHECK AND EXPLAIN AGREE
// ============================================================================

proptest! {
    #[test]
    fn range_check_matches_explain(n in any::<i64>(), lo in -1000i64..1000, span in 0i64..1000) {
        let c = Constraint::range(lo, lo + span);
        let value = json!(n);
        prop_assert_eq!(c.check(&value), c.explain(&value).is_none());
    }

    #[test]
    fn range_matches_integer_arithmetic(
        n in -5000i64..5000,
        lo in -1000i64..1000,
        span in 0i64..1000
    ) {
        let c = Constraint::range(lo, lo + span);
        prop_assert_eq!(c.check(&json!(n)), lo <= n && n <= lo + span);
    }

    #[test]
    fn length_matches_char_count(s in ".{0,40}", lo in 0usize..20, span in 0usize..20) {
        let c = Constraint::length(lo, lo + span);
        let len = s.chars().count();
        prop_assert_eq!(c.check(&json!(s)), lo <= len && len <= lo + span);
    }

    #[test]
    fn check_is_idempotent(s in ".{0,20}") {
        let c = Constraint::one_of(["a", "b", "c"]);
        let value = json!(s);
        prop_assert_eq!(c.check(&value), c.check(&value));
    }
}

// ============================================================================
// LIST_OF IS UNIFORM OVER ELEMENTS
// ============================================================================

proptest! {
    #[test]
    fn list_of_holds_iff_every_element_holds(items in prop::collection::vec(-20i64..20, 0..12)) {
        let inner = Constraint::range(0, 10);
        let list = Constraint::list_of(vec![inner.clone()]);
        let array = Value::Array(items.iter().map(|n| json!(n)).collect());

        let every = items.iter().all(|n| inner.check(&json!(n)));
        prop_assert_eq!(list.check(&array), every);
    }

    #[test]
    fn required_fields_holds_iff_all_keys_present(
        present in prop::collection::btree_set("[a-d]", 0..4)
    ) {
        let c = Constraint::required_fields(["a", "b"]);
        let object: serde_json::Map<String, Value> =
            present.iter().map(|k| (k.clone(), Value::Null)).collect();
        let expected = present.contains("a") && present.contains("b");
        prop_assert_eq!(c.check(&Value::Object(object)), expected);
    }
}

// ============================================================================
// EVERY VARIANT AGAINST EVERY JSON TYPE
// ============================================================================

#[test]
fn every_variant_against_every_json_type() {
    let values = [
        json!(null),
        json!(true),
        json!({"a": 1}),
        json!([1]),
        json!("s"),
        json!(0.5),
    ];
    // One row per constraint, one column per entry of `values`.
    let table = [
        (Constraint::range(0, 1), [false, false, false, false, false, true]),
        (Constraint::length(0, 1), [false, false, false, true, true, false]),
        (Constraint::one_of([json!(1), json!("s")]), [false, false, false, false, true, false]),
        (
            Constraint::list_of(vec![Constraint::range(0, 1)]),
            [false, false, false, true, false, false],
        ),
        (
            Constraint::object_shape(indexmap::IndexMap::new()),
            [false, false, true, false, false, false],
        ),
        (Constraint::required_fields(["a"]), [false, false, true, false, false, false]),
    ];

    for (c, expected) in &table {
        for (v, passes) in values.iter().zip(expected) {
            assert_eq!(c.check(v), *passes, "{c:?} on {v}");
            assert_eq!(Violation::from_check(c, v).is_some(), !passes, "{c:?} on {v}");
        }
    }
}
