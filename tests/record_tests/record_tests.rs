//! Tests for Record
//!
//! These tests verify:
//! - Required-field validation on creation
//! - Shallow merge semantics for partial updates
//! - Id matching across numeric, float, array and string ids
//! - Field order is preserved through serialization

use productd::record::{position, Record};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_complete_record_passes_validation() {
    let r = record(json!({"id": 1, "name": "Widget", "description": "A widget"}));
    assert!(r.has_required_fields());
}

#[test]
fn test_missing_fields_fail_validation() {
    assert!(!record(json!({"name": "x"})).has_required_fields());
    assert!(!record(json!({"id": 1, "name": "x"})).has_required_fields());
    assert!(!record(json!({})).has_required_fields());
}

#[test]
fn test_falsy_fields_fail_validation() {
    assert!(!record(json!({"id": 0, "name": "x", "description": "d"})).has_required_fields());
    assert!(!record(json!({"id": 1, "name": "", "description": "d"})).has_required_fields());
    assert!(!record(json!({"id": 1, "name": "x", "description": null})).has_required_fields());
    assert!(!record(json!({"id": false, "name": "x", "description": "d"})).has_required_fields());
}

#[test]
fn test_non_object_is_not_a_record() {
    assert!(Record::from_value(json!([1, 2])).is_none());
    assert!(Record::from_value(json!("text")).is_none());
    assert!(Record::from_value(json!(null)).is_none());
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_merge_overwrites_and_keeps_untouched_fields() {
    let mut r = record(json!({"id": 1, "name": "A", "description": "d", "extra": "z"}));
    r.merge(record(json!({"name": "B"})));

    assert_eq!(
        serde_json::to_value(&r).unwrap(),
        json!({"id": 1, "name": "B", "description": "d", "extra": "z"})
    );
}

#[test]
fn test_merge_adds_new_fields() {
    let mut r = record(json!({"id": 1, "name": "A", "description": "d"}));
    r.merge(record(json!({"price": 9.5, "tags": ["x"]})));

    assert_eq!(r.get("price"), Some(&json!(9.5)));
    assert_eq!(r.get("tags"), Some(&json!(["x"])));
    assert_eq!(serde_json::to_value(&r).unwrap().as_object().unwrap().len(), 5);
}

#[test]
fn test_merge_never_reassigns_id() {
    let mut r = record(json!({"id": 1, "name": "A", "description": "d"}));
    r.merge(record(json!({"id": 99, "name": "B"})));

    assert_eq!(r.get("id"), Some(&json!(1)));
    assert_eq!(r.get("name"), Some(&json!("B")));
}

// =============================================================================
// Id Matching Tests
// =============================================================================

#[test]
fn test_numeric_and_string_ids_match_path_text() {
    assert!(record(json!({"id": 42})).matches_id("42"));
    assert!(record(json!({"id": "42"})).matches_id("42"));
    assert!(record(json!({"id": "abc"})).matches_id("abc"));
    assert!(!record(json!({"id": 42})).matches_id("042"));
    assert!(!record(json!({"name": "no id"})).matches_id(""));
}

#[test]
fn test_integral_float_ids_match_integer_text() {
    assert!(record(json!({"id": 1.0})).matches_id("1"));
    assert!(record(json!({"id": -3.0})).matches_id("-3"));
    assert!(record(json!({"id": 0.0})).matches_id("0"));
    assert!(record(json!({"id": 2.5})).matches_id("2.5"));
    assert!(!record(json!({"id": 1.0})).matches_id("1.0"));
}

#[test]
fn test_array_ids_join_with_commas() {
    assert!(record(json!({"id": [1]})).matches_id("1"));
    assert!(record(json!({"id": [1, "a"]})).matches_id("1,a"));
    assert!(record(json!({"id": [null, 3]})).matches_id(",3"));
    assert!(record(json!({"id": []})).matches_id(""));
}

#[test]
fn test_position_resolves_first_duplicate() {
    let collection = vec![
        record(json!({"id": 2, "name": "other"})),
        record(json!({"id": 1, "name": "first"})),
        record(json!({"id": 1, "name": "second"})),
    ];

    assert_eq!(position(&collection, "1"), Some(1));
}

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_field_order_is_preserved() {
    let text = r#"{"zeta":1,"id":"a","alpha":2,"name":"n","description":"d"}"#;
    let r: Record = serde_json::from_str(text).unwrap();

    assert_eq!(serde_json::to_string(&r).unwrap(), text);
}
