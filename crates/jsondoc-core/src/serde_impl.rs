//! serde support for the node types.
//!
//! Serialization follows the text writer: undefined properties are skipped,
//! undefined elements become `null`, and non-finite doubles become their
//! sentinel strings. Decimals go out as `f64` unless they are whole numbers
//! within `i64`; use the text writer when every digit matters.

use crate::array::JsonArray;
use crate::convert::decimal_to_i128;
use crate::object::JsonObject;
use crate::value::JsonValue;
use crate::writer;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn decimal_to_i64(d: &BigDecimal) -> Option<i64> {
    decimal_to_i128(d).and_then(|n| i64::try_from(n).ok())
}

impl Serialize for JsonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            JsonValue::Null | JsonValue::Undefined => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Integer(n) => serializer.serialize_i64(*n),
            JsonValue::Double(d) if d.is_finite() => serializer.serialize_f64(*d),
            JsonValue::Double(d) => serializer.serialize_str(writer::non_finite_sentinel(*d)),
            JsonValue::Decimal(d) => match decimal_to_i64(d) {
                Some(n) => serializer.serialize_i64(n),
                None => match d.to_f64() {
                    Some(f) if f.is_finite() => serializer.serialize_f64(f),
                    _ => serializer.serialize_str(&writer::format_decimal(d)),
                },
            },
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Object(o) => o.serialize(serializer),
            JsonValue::Array(a) => a.serialize(serializer),
        }
    }
}

impl Serialize for JsonObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let present = self.values().filter(|v| !v.is_undefined()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (k, v) in self.iter() {
            if !v.is_undefined() {
                map.serialize_entry(k, v)?;
            }
        }
        map.end()
    }
}

impl Serialize for JsonArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::from(v))
    }

    fn visit_i128<E>(self, v: i128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match i64::try_from(v) {
            Ok(n) => Ok(JsonValue::Integer(n)),
            Err(_) => BigDecimal::from_str(&v.to_string())
                .map(JsonValue::Decimal)
                .map_err(E::custom),
        }
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match i64::try_from(v) {
            Ok(n) => Ok(JsonValue::Integer(n)),
            Err(_) => BigDecimal::from_str(&v.to_string())
                .map(JsonValue::Decimal)
                .map_err(E::custom),
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::Double(v))
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::String(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(JsonValue::String(s))
    }

    fn visit_seq<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut array = JsonArray::with_capacity(visitor.size_hint().unwrap_or(0));
        while let Some(v) = visitor.next_element::<JsonValue>()? {
            array.add(v);
        }
        Ok(JsonValue::Array(array))
    }

    fn visit_map<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut object = JsonObject::with_capacity(visitor.size_hint().unwrap_or(0));
        while let Some((key, value)) = visitor.next_entry::<String, JsonValue>()? {
            object.set_value(key, value);
        }
        Ok(JsonValue::Object(object))
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D>(deserializer: D) -> Result<JsonValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for JsonObject {
    fn deserialize<D>(deserializer: D) -> Result<JsonObject, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Object(o) => Ok(o),
            other => Err(de::Error::custom(format!("expected an object, found {}", other.kind()))),
        }
    }
}

impl<'de> Deserialize<'de> for JsonArray {
    fn deserialize<D>(deserializer: D) -> Result<JsonArray, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Array(a) => Ok(a),
            other => Err(de::Error::custom(format!("expected an array, found {}", other.kind()))),
        }
    }
}
