//! Integration tests for parameter values and column types

use synthdata_foundation::{ColumnType, ErrorKind, ParamBag, ParamValue};

// =============================================================================
// ParamValue
// =============================================================================

#[test]
fn conversions_pick_the_matching_variant() {
    assert_eq!(ParamValue::from(true), ParamValue::Bool(true));
    assert_eq!(ParamValue::from(18_i64), ParamValue::Int(18));
    assert_eq!(ParamValue::from(0.5), ParamValue::Float(0.5));
    assert_eq!(ParamValue::from("en_US").as_str(), Some("en_US"));
    assert_eq!(ParamValue::from(String::from("x")).kind_name(), "string");
}

#[test]
fn list_conversion_converts_items() {
    let value = ParamValue::from(vec!["red", "green"]);
    let items = value.as_list().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items.get(1).and_then(ParamValue::as_str), Some("green"));
}

#[test]
fn accessors_reject_other_kinds() {
    let value = ParamValue::Int(5);
    assert_eq!(value.as_bool(), None);
    assert_eq!(value.as_str(), None);
    assert!(value.as_list().is_none());
    assert!(!value.is_null());
    assert!(ParamValue::Null.is_null());
}

#[test]
fn as_float_promotes_integers() {
    assert_eq!(ParamValue::Int(4).as_float(), Some(4.0));
    assert_eq!(ParamValue::Float(2.5).as_float(), Some(2.5));
    assert_eq!(ParamValue::Bool(true).as_float(), None);
}

#[test]
fn display_is_unquoted_for_strings() {
    assert_eq!(ParamValue::from("abc").to_string(), "abc");
    assert_eq!(ParamValue::from(vec![1_i64, 2, 3]).to_string(), "[1, 2, 3]");
    assert_eq!(ParamValue::Null.to_string(), "null");
}

#[test]
fn debug_quotes_strings() {
    assert_eq!(format!("{:?}", ParamValue::from("abc")), "\"abc\"");
}

#[test]
fn param_bag_holds_named_values() {
    let bag = ParamBag::new()
        .insert("start".to_string(), ParamValue::Int(18))
        .insert("end".to_string(), ParamValue::Int(65));
    assert_eq!(bag.len(), 2);
    assert_eq!(bag.get(&"end".to_string()).and_then(ParamValue::as_int), Some(65));
    let keys: Vec<_> = bag.keys().cloned().collect();
    assert_eq!(keys, vec!["end".to_string(), "start".to_string()]);
}

// =============================================================================
// ColumnType
// =============================================================================

#[test]
fn column_type_literals_round_trip() {
    for ty in ColumnType::ALL {
        assert_eq!(ty.to_string().parse::<ColumnType>().unwrap(), ty);
    }
}

#[test]
fn column_type_unknown_literal() {
    let err = "varchar".parse::<ColumnType>().unwrap_err();
    match err.kind {
        ErrorKind::UnknownColumnType(literal) => assert_eq!(literal, "varchar"),
        other => panic!("unexpected error kind: {other:?}"),
    }
}
