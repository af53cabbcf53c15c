//! The JSON value node: a closed sum type over every JSON kind.
//!
//! Scalars are plain values. [`JsonObject`] and [`JsonArray`] own their
//! children outright, so a node can only ever sit in one container: moving a
//! value into a container takes it away from its previous owner, and putting a
//! container inside itself needs an explicit `clone()`.

use crate::array::JsonArray;
use crate::convert::decimal_to_i128;
use crate::error::Result;
use crate::object::JsonObject;
use crate::parser::{self, ParseOptions};
use crate::writer::{self, IndentStyle};

use bigdecimal::BigDecimal;
use chrono::{DateTime, SecondsFormat, Utc};
use num_traits::ToPrimitive;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use uuid::Uuid;

/// Largest integer magnitude that survives a round trip through an IEEE-754 double.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Shared "present, explicit null" node.
pub static NULL: JsonValue = JsonValue::Null;
/// Shared "not found" node returned by lookups that miss.
pub static UNDEFINED: JsonValue = JsonValue::Undefined;
pub static TRUE: JsonValue = JsonValue::Bool(true);
pub static FALSE: JsonValue = JsonValue::Bool(false);

/// Discriminant of a [`JsonValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Undefined,
    Boolean,
    Integer,
    Double,
    Decimal,
    String,
    Object,
    Array,
}

impl ValueKind {
    /// `true` for the three numeric kinds.
    pub fn is_number(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Double | ValueKind::Decimal)
    }

    /// `true` for `Null` and `Undefined`.
    pub fn is_nullish(self) -> bool {
        matches!(self, ValueKind::Null | ValueKind::Undefined)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Undefined => "undefined",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Double => "double",
            ValueKind::Decimal => "decimal",
            ValueKind::String => "string",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON document node.
#[derive(Debug, Clone, Default)]
pub enum JsonValue {
    #[default]
    Null,
    /// Lookup miss. Never produced by parsing.
    Undefined,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
    Object(JsonObject),
    Array(JsonArray),
}

impl JsonValue {
    /// Parse a complete document leniently (see [`ParseOptions`]).
    pub fn parse(text: &str) -> Result<JsonValue> {
        parser::parse_str(text, ParseOptions::default())
    }

    /// Parse a complete document with explicit options.
    pub fn parse_with(text: &str, options: ParseOptions) -> Result<JsonValue> {
        parser::parse_str(text, options)
    }

    /// The node's kind tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::Null => ValueKind::Null,
            JsonValue::Undefined => ValueKind::Undefined,
            JsonValue::Bool(_) => ValueKind::Boolean,
            JsonValue::Integer(_) => ValueKind::Integer,
            JsonValue::Double(_) => ValueKind::Double,
            JsonValue::Decimal(_) => ValueKind::Decimal,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Object(_) => ValueKind::Object,
            JsonValue::Array(_) => ValueKind::Array,
        }
    }

    /// `true` only for an explicit `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// `true` for the placeholder returned by missed lookups.
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsonValue::Undefined)
    }

    /// `true` for both `Null` and `Undefined`: the value is absent for existence checks.
    pub fn is_nullish(&self) -> bool {
        self.kind().is_nullish()
    }

    /// Integer, double or decimal.
    pub fn is_number(&self) -> bool {
        self.kind().is_number()
    }

    /// `false` for integers whose magnitude exceeds [`MAX_SAFE_INTEGER`].
    /// Non-integer kinds report `true`.
    pub fn is_safe_integer(&self) -> bool {
        match self {
            JsonValue::Integer(n) => n.unsigned_abs() <= MAX_SAFE_INTEGER as u64,
            _ => true,
        }
    }

    /// The boolean payload, without coercion.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload; doubles and decimals return `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric kind as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Integer(n) => Some(*n as f64),
            JsonValue::Double(d) => Some(*d),
            JsonValue::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the object payload.
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrow the object payload.
    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrow the array payload.
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutably borrow the array payload.
    pub fn as_array_mut(&mut self) -> Option<&mut JsonArray> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Walk object keys and array indices. Any miss yields `Undefined`.
    pub fn get_path(&self, path: &[&str]) -> &JsonValue {
        let mut current = self;
        for segment in path {
            current = match current {
                JsonValue::Object(o) => o.get_value(segment),
                JsonValue::Array(a) => match segment.parse::<usize>() {
                    Ok(i) => a.try_get(i),
                    Err(_) => &UNDEFINED,
                },
                _ => &UNDEFINED,
            };
            if current.is_undefined() {
                break;
            }
        }
        current
    }

    /// Serialize with the given indentation.
    pub fn to_json_string(&self, style: IndentStyle) -> String {
        writer::to_string(self, &writer::WriteOptions::new(style))
    }
}

/// Numeric equality across the three numeric kinds.
fn numbers_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Integer(x), JsonValue::Integer(y)) => x == y,
        (JsonValue::Double(x), JsonValue::Double(y)) => x == y,
        (JsonValue::Decimal(x), JsonValue::Decimal(y)) => x == y,
        (JsonValue::Integer(i), JsonValue::Double(d)) | (JsonValue::Double(d), JsonValue::Integer(i)) => {
            d.fract() == 0.0 && d.to_i64() == Some(*i)
        }
        (JsonValue::Integer(i), JsonValue::Decimal(d)) | (JsonValue::Decimal(d), JsonValue::Integer(i)) => {
            decimal_to_i128(d) == Some(i128::from(*i))
        }
        (JsonValue::Double(f), JsonValue::Decimal(d)) | (JsonValue::Decimal(d), JsonValue::Double(f)) => {
            d.to_f64() == Some(*f)
        }
        _ => false,
    }
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Undefined, JsonValue::Undefined) => true,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Object(a), JsonValue::Object(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => numbers_equal(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string(IndentStyle::Minified))
    }
}

impl FromStr for JsonValue {
    type Err = crate::error::JsonError;

    fn from_str(s: &str) -> Result<Self> {
        JsonValue::parse(s)
    }
}

impl Index<&str> for JsonValue {
    type Output = JsonValue;

    /// Property lookup; `Undefined` for misses and non-objects.
    fn index(&self, key: &str) -> &JsonValue {
        match self {
            JsonValue::Object(o) => o.get_value(key),
            _ => &UNDEFINED,
        }
    }
}

impl Index<usize> for JsonValue {
    type Output = JsonValue;

    /// Element lookup; `Undefined` for misses and non-arrays.
    fn index(&self, index: usize) -> &JsonValue {
        match self {
            JsonValue::Array(a) => a.try_get(index),
            _ => &UNDEFINED,
        }
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for JsonValue {
                fn from(n: $t) -> Self {
                    JsonValue::Integer(i64::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for JsonValue {
    /// Values above `i64::MAX` become doubles.
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => JsonValue::Integer(i),
            Err(_) => JsonValue::Double(n as f64),
        }
    }
}

impl From<usize> for JsonValue {
    fn from(n: usize) -> Self {
        JsonValue::from(n as u64)
    }
}

impl From<isize> for JsonValue {
    fn from(n: isize) -> Self {
        JsonValue::Integer(n as i64)
    }
}

impl From<f32> for JsonValue {
    fn from(n: f32) -> Self {
        JsonValue::Double(f64::from(n))
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Double(n)
    }
}

impl From<BigDecimal> for JsonValue {
    fn from(d: BigDecimal) -> Self {
        JsonValue::Decimal(d)
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<char> for JsonValue {
    fn from(c: char) -> Self {
        JsonValue::String(c.to_string())
    }
}

impl From<Uuid> for JsonValue {
    fn from(id: Uuid) -> Self {
        JsonValue::String(id.hyphenated().to_string())
    }
}

impl From<DateTime<Utc>> for JsonValue {
    /// ISO-8601 with millisecond precision and a `Z` suffix.
    fn from(dt: DateTime<Utc>) -> Self {
        JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<JsonObject> for JsonValue {
    fn from(o: JsonObject) -> Self {
        JsonValue::Object(o)
    }
}

impl From<JsonArray> for JsonValue {
    fn from(a: JsonArray) -> Self {
        JsonValue::Array(a)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(JsonArray::from(items))
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(JsonValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => JsonValue::Integer(i),
                None => JsonValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(map) => {
                JsonValue::Object(map.into_iter().map(|(k, v)| (k, JsonValue::from(v))).collect())
            }
        }
    }
}

impl From<&JsonValue> for serde_json::Value {
    /// `Undefined` maps to `null`; non-finite doubles map to their sentinel strings.
    fn from(v: &JsonValue) -> Self {
        match v {
            JsonValue::Null | JsonValue::Undefined => serde_json::Value::Null,
            JsonValue::Bool(b) => serde_json::Value::Bool(*b),
            JsonValue::Integer(i) => serde_json::Value::from(*i),
            JsonValue::Double(d) => match serde_json::Number::from_f64(*d) {
                Some(n) => serde_json::Value::Number(n),
                None => serde_json::Value::String(writer::non_finite_sentinel(*d).to_string()),
            },
            JsonValue::Decimal(d) => match decimal_to_i128(d).and_then(|n| i64::try_from(n).ok()) {
                Some(i) => serde_json::Value::from(i),
                None => d
                    .to_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
            },
            JsonValue::String(s) => serde_json::Value::String(s.clone()),
            JsonValue::Array(a) => serde_json::Value::Array(a.iter().map(Into::into).collect()),
            JsonValue::Object(o) => serde_json::Value::Object(
                o.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(JsonValue::Null.kind(), ValueKind::Null);
        assert_eq!(UNDEFINED.kind(), ValueKind::Undefined);
        assert_eq!(JsonValue::from(1.5).kind(), ValueKind::Double);
        assert_eq!(JsonValue::from("x").kind(), ValueKind::String);
        assert_eq!(JsonValue::from(JsonArray::new()).kind(), ValueKind::Array);
    }

    #[test]
    fn null_and_undefined_are_distinct_but_both_nullish() {
        assert_ne!(NULL, UNDEFINED);
        assert!(NULL.is_nullish());
        assert!(UNDEFINED.is_nullish());
        assert_eq!(NULL, JsonValue::Null);
    }

    #[test]
    fn numeric_equality_crosses_kinds() {
        assert_eq!(JsonValue::Integer(3), JsonValue::Double(3.0));
        assert_eq!(JsonValue::Double(3.0), JsonValue::Integer(3));
        assert_eq!(
            JsonValue::Decimal(BigDecimal::from(3)),
            JsonValue::Integer(3)
        );
        assert_eq!(
            JsonValue::Decimal("2.5".parse().unwrap()),
            JsonValue::Double(2.5)
        );
        assert_ne!(JsonValue::Integer(3), JsonValue::Double(3.5));
        assert_ne!(JsonValue::Integer(1), JsonValue::Bool(true));
        assert_ne!(JsonValue::Double(f64::NAN), JsonValue::Double(f64::NAN));
    }

    #[test]
    fn safe_integer_bound() {
        assert!(JsonValue::Integer(MAX_SAFE_INTEGER).is_safe_integer());
        assert!(JsonValue::Integer(-MAX_SAFE_INTEGER).is_safe_integer());
        assert!(!JsonValue::Integer(MAX_SAFE_INTEGER + 1).is_safe_integer());
        assert!(!JsonValue::Integer(i64::MIN).is_safe_integer());
    }

    #[test]
    fn large_unsigned_becomes_double() {
        assert_eq!(JsonValue::from(u64::MAX).kind(), ValueKind::Double);
        assert_eq!(JsonValue::from(42u64).kind(), ValueKind::Integer);
    }

    #[test]
    fn path_lookup() {
        let doc = JsonValue::parse(r#"{"a": {"b": [10, {"c": true}]}}"#).unwrap();
        assert_eq!(doc.get_path(&["a", "b", "0"]), &JsonValue::Integer(10));
        assert_eq!(doc.get_path(&["a", "b", "1", "c"]), &TRUE);
        assert!(doc.get_path(&["a", "x", "y"]).is_undefined());
        assert!(doc.get_path(&["a", "b", "9"]).is_undefined());
        assert!(doc["a"]["missing"].is_undefined());
        assert_eq!(doc["a"]["b"][0], JsonValue::Integer(10));
    }

    #[test]
    fn serde_json_interop() {
        let sj = serde_json::json!({"n": 1, "f": 2.5, "s": "x", "l": [null, true]});
        let v = JsonValue::from(sj.clone());
        assert_eq!(v["f"], JsonValue::Double(2.5));
        assert_eq!(serde_json::Value::from(&v), sj);
        assert_eq!(
            serde_json::Value::from(&JsonValue::Double(f64::INFINITY)),
            serde_json::json!("Infinity")
        );
    }
}
