//! # Strict Schema Behaviour
//!
//! End-to-end checks of `FieldSchema` through the public API: declared
//! ordering, keyword overrides, the error taxonomy, and casting.

use enumap::{Args, CastFailure, Caster, Enumap, EnumapError, FieldSchema, Value};
use serde_json::json;

fn abc() -> FieldSchema {
    FieldSchema::new("a", "b c e").expect("valid declaration")
}

fn to_values<I: IntoIterator<Item = i64>>(items: I) -> Vec<Value> {
    items.into_iter().map(Value::from).collect()
}

#[test]
fn names_are_returned_verbatim_not_sorted() {
    let a = abc();
    let names: Vec<&str> = a.names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["b", "c", "e"]);

    let reversed = FieldSchema::new("r", "zulu yankee xray").unwrap();
    let names: Vec<&str> = reversed.names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["zulu", "yankee", "xray"]);
}

#[test]
fn positional_record_is_readable_by_name() {
    let record = abc().record(Args::positional([1, 2, 3])).unwrap();
    assert_eq!(record, to_values([1, 2, 3]));
    assert_eq!(record.get("b"), Some(&json!(1)));
    assert_eq!(record.get("c"), Some(&json!(2)));
    assert_eq!(record.get("e"), Some(&json!(3)));
}

#[test]
fn keyword_overrides_only_its_field() {
    let a = abc();
    let record = a.record(Args::positional([1, 2, 3]).keyword("e", 33)).unwrap();
    assert_eq!(record, to_values([1, 2, 33]));

    let map = a.map(Args::positional([1, 2, 3]).keyword("e", 33)).unwrap();
    let keys: Vec<&String> = map.keys().collect();
    assert_eq!(keys, ["b", "c", "e"]);
    assert_eq!(map["e"], json!(33));
}

#[test]
fn long_schemas_keep_order_in_both_directions() {
    let forward: Vec<String> = (0..100).map(|i| format!("n{i}")).collect();
    let backward: Vec<String> = (0..100).rev().map(|i| format!("n{i}")).collect();
    let a = FieldSchema::from_names("forward", &forward).unwrap();
    let b = FieldSchema::from_names("backward", &backward).unwrap();

    let mut expected_a = to_values(0..100);
    expected_a[42] = json!(9000);
    let record_a = a
        .record(Args::positional(0..100i64).keyword("n42", 9000))
        .unwrap();
    assert_eq!(record_a, expected_a);

    // In the backward schema `n42` sits at position 57.
    let mut expected_b = to_values(0..100);
    expected_b[57] = json!(9000);
    let record_b = b
        .record(Args::positional(0..100i64).keyword("n42", 9000))
        .unwrap();
    assert_eq!(record_b, expected_b);
}

#[test]
fn missing_field_is_a_mismatch() {
    let err = abc().record(Args::positional([1, 3])).unwrap_err();
    match &err {
        EnumapError::SchemaMismatch {
            missing, invalid, ..
        } => {
            assert_eq!(missing.iter().collect::<Vec<_>>(), ["e"]);
            assert!(invalid.is_empty());
        }
        other => panic!("Expected SchemaMismatch, got: {other}"),
    }
    assert!(err.to_string().contains("missing fields {e}"));
}

#[test]
fn invalid_keyword_is_a_mismatch() {
    let err = abc()
        .record(Args::positional([1, 3, 4]).keyword("f", "nope"))
        .unwrap_err();
    assert_eq!(err.invalid().unwrap().iter().collect::<Vec<_>>(), ["f"]);
    assert!(err.missing().unwrap().is_empty());
}

#[test]
fn too_many_positional_values_for_every_operation() {
    let mut a = abc();
    a.set_types(Args::positional([Caster::int(), Caster::int(), Caster::int()]))
        .unwrap();
    let calls: [fn(&FieldSchema) -> Result<(), EnumapError>; 4] = [
        |s| s.map(Args::positional([3, 4, 5, 6])).map(drop),
        |s| s.map_casted(Args::positional([3, 4, 5, 6])).map(drop),
        |s| s.record(Args::positional([3, 4, 5, 6])).map(drop),
        |s| s.record_casted(Args::positional([3, 4, 5, 6])).map(drop),
    ];
    for call in calls {
        match call(&a) {
            Err(EnumapError::TooManyArguments {
                expected: 3,
                got: 4,
                ..
            }) => {}
            other => panic!("Expected TooManyArguments(3, 4), got: {other:?}"),
        }
    }
}

#[test]
fn map_casted_applies_positional_and_keyword_types() {
    let mut a = abc();
    a.set_types(Args::new().push(Caster::int()).push(Caster::int()).push(Caster::float()))
        .unwrap();
    let map = a.map_casted("1 2.2 3.3".split(' ').collect()).unwrap();
    assert_eq!(map["b"], json!(1));
    assert_eq!(map["c"], json!(2));
    assert_eq!(map["e"], json!(3.3));

    a.set_types(
        Args::positional([Caster::int(), Caster::int(), Caster::float()])
            .keyword("e", Caster::int()),
    )
    .unwrap();
    let map = a.map_casted("1 2.2 3.3".split(' ').collect()).unwrap();
    assert_eq!(map["e"], json!(3));
}

#[test]
fn record_casted_with_keyword_value_override() {
    let mut a = abc();
    a.set_types(
        Args::positional([Caster::int(), Caster::int(), Caster::float()])
            .keyword("e", Caster::int()),
    )
    .unwrap();
    let args: Args = "1 2.2 3.3".split(' ').collect();
    let record = a.record_casted(args.keyword("b", 2.2)).unwrap();
    assert_eq!(record, to_values([2, 2, 3]));
}

#[test]
fn cast_failure_names_first_field_and_keeps_cause() {
    use std::error::Error;

    let mut a = abc();
    a.set_types(Args::positional([Caster::int(), Caster::int(), Caster::int()]))
        .unwrap();
    let err = a
        .record_casted(Args::positional(["1", "two", "three"]))
        .unwrap_err();
    let cast = err.as_cast().expect("cast error");
    assert_eq!(cast.field, "c");
    assert_eq!(cast.value, json!("two"));
    assert_eq!(cast.value_kind.as_str(), "str");
    assert!(matches!(cast.source, CastFailure::InvalidLiteral { .. }));
    assert!(err.source().is_some());
}

#[test]
fn uncast_fields_pass_through() {
    let mut a = abc();
    a.set_types(Args::new().keyword("c", Caster::int())).unwrap();
    let record = a
        .record_casted(Args::positional([json!("keep"), json!("7"), json!([1, 2])]))
        .unwrap();
    assert_eq!(record, vec![json!("keep"), json!(7), json!([1, 2])]);
}

#[test]
fn repeated_calls_are_idempotent() {
    let a = abc();
    let args = Args::positional([1, 2]).keyword("e", "x");
    assert_eq!(a.map(args.clone()).unwrap(), a.map(args.clone()).unwrap());
    assert_eq!(a.record(args.clone()).unwrap(), a.record(args).unwrap());
}
