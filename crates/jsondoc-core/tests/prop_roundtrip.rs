/// Property-based tests over generated documents.
///
/// Strategies generate finite numbers, strings with escapes and unicode,
/// and objects/arrays nested up to four levels. `Undefined` is excluded:
/// it is written as `null` and so cannot come back as itself. Decimals and
/// non-finite doubles have their own properties, since both come back as a
/// different kind.
use jsondoc_core::{
    parse_json_lines, to_json_lines, Coercion, IndentStyle, JsonArray, JsonObject, JsonValue,
};
use bigdecimal::BigDecimal;
use proptest::prelude::*;
use std::str::FromStr;

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        Just(String::new()),
        Just("with space".to_string()),
        Just("quo\"te".to_string()),
        Just("caf\u{00e9}".to_string()),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,24}",
        Just(String::new()),
        Just("line\nbreak\ttab".to_string()),
        Just("back\\slash \"quoted\"".to_string()),
        Just("\u{1}\u{1f}".to_string()),
        Just("\u{4f60}\u{597d} \u{1f600}".to_string()),
        Just("NaN".to_string()),
    ]
}

fn arb_leaf() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(JsonValue::Integer),
        any::<f64>()
            .prop_filter("finite", |d| d.is_finite())
            .prop_map(JsonValue::Double),
        arb_string().prop_map(JsonValue::String),
    ]
}

/// Mantissas across the full `i64` range with scales wide enough to reach the
/// writer's exponent form in both directions.
fn arb_decimal() -> impl Strategy<Value = BigDecimal> {
    prop_oneof![
        (any::<i64>(), -40i64..40).prop_map(|(m, scale)| BigDecimal::new(m.into(), scale)),
        (-1000i64..1000, -3i64..3).prop_map(|(m, scale)| BigDecimal::new(m.into(), scale)),
        Just(BigDecimal::new(0.into(), 40)),
        Just(BigDecimal::new(i64::MIN.into(), -40)),
    ]
}

fn arb_non_finite() -> impl Strategy<Value = f64> {
    prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
}

fn arb_value() -> impl Strategy<Value = JsonValue> {
    arb_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|items| JsonValue::Array(JsonArray::from(items))),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| JsonValue::Object(entries.into_iter().collect::<JsonObject>())),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = JsonObject> {
    prop::collection::vec((arb_key(), arb_value()), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn minified_roundtrip(value in arb_value()) {
        let text = value.to_json_string(IndentStyle::Minified);
        let back = JsonValue::parse(&text).unwrap();
        prop_assert_eq!(&back, &value, "text: {}", text);
    }

    #[test]
    fn indented_roundtrip(value in arb_value(), width in 0usize..5) {
        let text = value.to_json_string(IndentStyle::Indented(width));
        let back = JsonValue::parse(&text).unwrap();
        prop_assert_eq!(&back, &value, "text: {}", text);
    }

    #[test]
    fn decimal_text_is_exact(d in arb_decimal(), width in 0usize..3) {
        let value = JsonValue::Decimal(d.clone());
        let text = value.to_json_string(IndentStyle::Minified);
        prop_assert_eq!(BigDecimal::from_str(&text).unwrap(), d.clone(), "text: {}", &text);

        let wrapped = JsonValue::from(vec![JsonValue::Null, value.clone()]);
        let doc = wrapped.to_json_string(IndentStyle::Indented(width));
        let back = JsonValue::parse_with(&doc, jsondoc_core::ParseOptions::strict()).unwrap();
        let element = &back[1];
        prop_assert!(element.is_number(), "doc: {}", &doc);
        prop_assert_eq!(element.as_f64(), text.parse::<f64>().ok());
        if element.kind() == jsondoc_core::ValueKind::Integer {
            prop_assert_eq!(element, &value);
        }
    }

    #[test]
    fn non_finite_doubles_come_back_as_sentinels(d in arb_non_finite()) {
        let value = JsonValue::from(vec![JsonValue::Double(d)]);
        let back = JsonValue::parse(&value.to_json_string(IndentStyle::Minified)).unwrap();
        let sentinel = back[0].as_str().unwrap();
        prop_assert!(["NaN", "Infinity", "-Infinity"].contains(&sentinel));
        let restored = back[0].try_convert::<f64>(Coercion::Compatible).unwrap();
        if d.is_nan() {
            prop_assert!(restored.is_nan());
        } else {
            prop_assert_eq!(restored, d);
        }
        prop_assert!(back[0].try_convert::<f64>(Coercion::Strict).is_none());
    }

    #[test]
    fn serde_agrees_with_text_writer(value in arb_value()) {
        let via_serde = serde_json::to_string(&value).unwrap();
        let back: JsonValue = serde_json::from_str(&via_serde).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn key_order_survives_roundtrip(object in arb_object()) {
        let back = JsonObject::parse(&object.to_string()).unwrap();
        let before: Vec<&String> = object.keys().collect();
        let after: Vec<&String> = back.keys().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn json_lines_roundtrip(items in prop::collection::vec(prop::option::of(arb_object()), 0..6)) {
        let text = to_json_lines(&items);
        prop_assert_eq!(parse_json_lines(&text).unwrap(), items);
    }

    #[test]
    fn integer_strings_coerce(n in any::<i32>()) {
        let v = JsonValue::from(n.to_string());
        prop_assert_eq!(v.try_convert::<i32>(Coercion::Compatible), Some(n));
        prop_assert_eq!(v.try_convert::<i32>(Coercion::Strict), None);
    }

    #[test]
    fn integer_narrowing_never_truncates(n in any::<i64>()) {
        let got = JsonValue::Integer(n).try_convert::<i16>(Coercion::Strict);
        prop_assert_eq!(got, i16::try_from(n).ok());
    }
}
