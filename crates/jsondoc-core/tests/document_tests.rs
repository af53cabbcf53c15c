use jsondoc_core::{
    IndentStyle, JsonArray, JsonError, JsonObject, JsonValue, ParseOptions, ValueKind,
};

fn parse(text: &str) -> JsonValue {
    JsonValue::parse(text).expect("parse failed")
}

/// Serialize, parse back and compare.
fn assert_roundtrip(text: &str) {
    let value = parse(text);
    for style in [IndentStyle::Minified, IndentStyle::Indented(2)] {
        let written = value.to_json_string(style);
        let back = parse(&written);
        assert_eq!(value, back, "roundtrip failed:\n  input: {text}\n  output: {written}");
    }
}

// ============================================================================
// Roundtrips
// ============================================================================

#[test]
fn roundtrip_scalars() {
    for text in ["null", "true", "false", "0", "-7", "3.25", "1e300", r#""hé\n\"q\"""#] {
        assert_roundtrip(text);
    }
}

#[test]
fn roundtrip_nested_document() {
    assert_roundtrip(
        r#"{"name": "Ann", "tags": ["a", 1, 2.5, null, true],
            "address": {"city": "Oslo", "geo": {"lat": 59.91, "lon": 10.75}},
            "empty": {}, "none": []}"#,
    );
}

#[test]
fn non_finite_doubles_use_sentinel_strings() {
    let v = JsonValue::from(vec![
        JsonValue::Double(f64::NAN),
        JsonValue::Double(f64::INFINITY),
        JsonValue::Double(f64::NEG_INFINITY),
    ]);
    let text = v.to_string();
    assert_eq!(text, r#"["NaN","Infinity","-Infinity"]"#);
    let back = parse(&text);
    assert_eq!(back[0].kind(), ValueKind::String);
    assert!(back.as_array().unwrap().try_get_double_value(0).unwrap().is_nan());
}

#[test]
fn undefined_is_never_written_as_a_property() {
    let mut o = JsonObject::new();
    o.set_value("a", JsonValue::Undefined);
    o.set_value("b", JsonValue::from(vec![JsonValue::Undefined]));
    assert_eq!(o.to_string(), r#"{"b":[null]}"#);
}

#[test]
fn indented_output() {
    let v = parse(r#"{"a": [1, {}], "b": {"c": null}}"#);
    assert_eq!(
        v.to_json_string(IndentStyle::Indented(2)),
        "{\n  \"a\": [\n    1,\n    {}\n  ],\n  \"b\": {\n    \"c\": null\n  }\n}"
    );
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn numeric_kinds_compare_by_value() {
    assert_eq!(JsonValue::Integer(3), JsonValue::Double(3.0));
    assert_ne!(JsonValue::Integer(3), JsonValue::Double(3.5));
    assert_ne!(JsonValue::Integer(3), JsonValue::from("3"));
    assert_ne!(JsonValue::Null, JsonValue::Undefined);
    assert!(JsonValue::Null.is_nullish() && JsonValue::Undefined.is_nullish());
}

#[test]
fn oversized_integers_become_doubles() {
    let v = parse("[9223372036854775807, 9223372036854775808]");
    assert_eq!(v[0].kind(), ValueKind::Integer);
    assert_eq!(v[1].kind(), ValueKind::Double);
}

#[test]
fn safe_integer_tracking() {
    assert!(JsonValue::Integer(9_007_199_254_740_991).is_safe_integer());
    assert!(!JsonValue::Integer(9_007_199_254_740_992).is_safe_integer());
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn object_update_keeps_position_and_readd_appends() {
    let mut o = JsonObject::parse(r#"{"a": 1, "b": 2, "c": 3}"#).unwrap();
    o.set_value("a", 10);
    assert_eq!(o.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    o.remove("a");
    o.set_value("a", 11);
    assert_eq!(o.keys().collect::<Vec<_>>(), ["b", "c", "a"]);
    assert_eq!(o.to_string(), r#"{"b":2,"c":3,"a":11}"#);
}

#[test]
fn missing_keys_are_undefined_not_errors() {
    let o = JsonObject::parse(r#"{"a": {"b": [1, 2]}}"#).unwrap();
    assert!(o["zzz"].is_undefined());
    assert_eq!(o.get_value_kind("zzz"), ValueKind::Undefined);
    assert!(o.try_get_value("zzz").is_none());
    let doc = JsonValue::Object(o);
    assert_eq!(doc.get_path(&["a", "b", "1"]), &JsonValue::Integer(2));
    assert!(doc.get_path(&["a", "x", "1"]).is_undefined());
    assert!(doc["a"]["b"][7].is_undefined());
}

#[test]
fn typed_getters_distinguish_only_through_kind() {
    let o = JsonObject::parse(r#"{"n": "x", "m": 5}"#).unwrap();
    assert_eq!(o.try_get_int32_value("n"), None);
    assert_eq!(o.try_get_int32_value("missing"), None);
    assert!(o.contains_key("n"));
    assert_eq!(o.get_value_kind("n"), ValueKind::String);
    assert!(matches!(o.get_int32_value("missing"), Err(JsonError::NotFound(_))));
    assert!(matches!(o.get_int32_value("n"), Err(JsonError::Conversion { .. })));
    assert_eq!(o.get_int32_value("m").unwrap(), 5);
}

#[test]
fn array_clone_is_deep() {
    let mut original = JsonArray::parse(r#"[{"k": "v"}, [1]]"#).unwrap();
    let copy = original.clone();
    original
        .get_mut(0)
        .unwrap()
        .as_object_mut()
        .unwrap()
        .set_value("k", "changed");
    original.get_mut(1).unwrap().as_array_mut().unwrap().add(2);
    assert_eq!(copy.to_string(), r#"[{"k":"v"},[1]]"#);
    assert_eq!(original.to_string(), r#"[{"k":"changed"},[1,2]]"#);
}

#[test]
fn inserting_a_container_into_itself_needs_a_copy() {
    let mut o = JsonObject::parse(r#"{"a": 1}"#).unwrap();
    let snapshot = JsonValue::Object(o.clone());
    o.set_value_ref("self", &snapshot);
    assert_eq!(o.to_string(), r#"{"a":1,"self":{"a":1}}"#);
}

#[test]
fn merge_is_deep() {
    let mut base = JsonObject::parse(r#"{"a": {"x": 1, "y": 2}, "b": 1}"#).unwrap();
    let patch = JsonObject::parse(r#"{"a": {"y": 3, "z": 4}, "c": [1]}"#).unwrap();
    base.merge(&patch);
    assert_eq!(base.to_string(), r#"{"a":{"x":1,"y":3,"z":4},"b":1,"c":[1]}"#);
}

// ============================================================================
// Parsing modes
// ============================================================================

#[test]
fn comments_are_transparent() {
    let v = parse("// header\n{ /* a */ \"a\": 1, \"b\": /* b */ [2] }");
    assert_eq!(v.to_string(), r#"{"a":1,"b":[2]}"#);
}

#[test]
fn strict_parse_rejects_empty_and_trailing_input() {
    assert!(JsonValue::parse_with("", ParseOptions::strict()).is_err());
    assert!(JsonValue::parse("").unwrap().is_undefined());
    assert!(JsonValue::parse("[1] 2").is_err());
}

#[test]
fn root_kind_checks() {
    assert!(JsonObject::parse("[1]").is_err());
    assert!(JsonArray::parse("{}").is_err());
    assert!("{\"a\":1}".parse::<JsonObject>().is_ok());
}
