//! Assertions over caller-defined types through the serde inspection bridge.

use serde::Serialize;
use serde_json::json;
use verity::inspect::to_value;
use verity::predicates::{deep_equal, is_empty, is_nil};
use verity::{assert, Struct, TestContext, Value};

#[derive(Serialize, Clone, Default)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Serialize)]
struct Order {
    id: u32,
    items: Vec<String>,
    note: Option<String>,
}

#[test]
fn derived_struct_matches_hand_built_record() {
    let t = TestContext::current();
    let order = Order {
        id: 7,
        items: vec!["pen".to_string()],
        note: None,
    };
    let expected = Struct::new("Order")
        .field("id", 7u32)
        .field("items", vec!["pen"])
        .field("note", None::<String>);
    assert::equal(&t, expected, to_value(&order).unwrap(), &[]);
}

#[test]
fn reference_to_zero_struct_is_empty() {
    let zero = to_value(&Some(Point::default())).unwrap();
    let moved = to_value(&Some(Point { x: 0, y: 3 })).unwrap();
    assert!(is_empty(&zero));
    assert!(!is_empty(&moved));
    assert!(!is_nil(&zero));
    assert!(is_nil(&to_value(&None::<Point>).unwrap()));
}

#[test]
fn json_documents_compare_structurally() {
    let t = TestContext::current();
    let a = to_value(&json!({"name": "ada", "langs": ["en", "fr"], "manager": null})).unwrap();
    let b = to_value(&json!({"manager": null, "langs": ["en", "fr"], "name": "ada"})).unwrap();
    assert::equal(&t, a.clone(), b, &[]);

    let reordered =
        to_value(&json!({"name": "ada", "langs": ["fr", "en"], "manager": null})).unwrap();
    assert::not_equal(&t, a, reordered, &[]);
}

#[test]
fn json_null_is_absence() {
    let t = TestContext::current();
    let null = to_value(&json!(null)).unwrap();
    assert::nil(&t, null.clone(), &[]);
    assert::empty(&t, null, &[]);
    assert::empty(&t, to_value(&json!([])).unwrap(), &[]);
    assert::not_empty(&t, to_value(&json!({"k": 0})).unwrap(), &[]);
}

#[test]
fn symmetry_over_inspected_values() {
    let values: Vec<Value> = vec![
        to_value(&Point::default()).unwrap(),
        to_value(&Point { x: 1, y: 2 }).unwrap(),
        to_value(&Some(Point::default())).unwrap(),
        to_value(&json!({"x": 0, "y": 0})).unwrap(),
        to_value(&(0i32, 0i32)).unwrap(),
        to_value(&vec![0i32, 0]).unwrap(),
    ];
    for a in &values {
        for b in &values {
            assert_eq!(deep_equal(a, b), deep_equal(b, a));
        }
    }
    // a record is not a mapping with the same entries
    assert!(!deep_equal(&values[0], &values[3]));
}
