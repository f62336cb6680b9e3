use super::*;

#[test]
fn test_native_values_compare_by_identity() {
    let shared = Value::native(String::from("handle"));
    let copy = shared.clone();
    let other = Value::native(String::from("handle"));

    assert_eq!(shared, copy);
    assert_ne!(shared, other);
    assert_eq!(shared.downcast::<String>().map(String::as_str), Some("handle"));
    assert!(shared.downcast::<u32>().is_none());
}

#[test]
fn test_json_conversion_keeps_structure() {
    let json = serde_json::json!({ "port": 8080, "tags": ["a", "b"], "debug": false });
    let value = Value::from(json.clone());

    assert_eq!(value.get("port").and_then(Value::as_number), Some(8080.0));
    assert_eq!(value.get("debug").and_then(Value::as_bool), Some(false));
    assert_eq!(value.to_json(), json);
}

#[test]
fn test_native_becomes_null_in_json() {
    let value = Value::Array(vec![Value::from(1), Value::native(42u8)]);
    assert_eq!(value.to_json(), serde_json::json!([1, null]));
}

#[test]
fn test_integral_numbers_serialize_without_fraction() {
    let value = Value::Array(vec![Value::from(42), Value::from(-3.0), Value::from(1.5)]);
    assert_eq!(serde_json::to_string(&value.to_json()).expect("json"), "[42,-3,1.5]");

    // beyond the exact range stays a float
    let big = Value::from(1.0e300);
    assert!(big.to_json().is_f64());
}
