//! Ordered JSON object with typed accessors.
//!
//! Keys keep their insertion order: updating an existing key leaves it in
//! place, while removing a key and setting it again moves it to the end.
//!
//! Typed getters come in two flavours. `try_get_*` answer `None` both when the
//! key is missing and when its value cannot be converted; callers that need to
//! tell the two apart check [`JsonObject::contains_key`] or
//! [`JsonObject::get_value_kind`] first. `get_*` return a [`Result`] instead.

use crate::array::JsonArray;
use crate::convert::{Coercion, DateEpoch, FromJsonValue};
use crate::error::{JsonError, Result};
use crate::parser::ParseOptions;
use crate::value::{JsonValue, ValueKind, UNDEFINED};
use crate::writer::IndentStyle;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::ops::Index;
use std::str::FromStr;
use uuid::Uuid;

/// A JSON object preserving key insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    map: IndexMap<String, JsonValue>,
}

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(capacity),
        }
    }

    /// Parse text whose root must be an object.
    pub fn parse(text: &str) -> Result<JsonObject> {
        Self::parse_with(text, ParseOptions::default())
    }

    /// Parse in strict or lenient mode.
    pub fn parse_with(text: &str, options: ParseOptions) -> Result<JsonObject> {
        match JsonValue::parse_with(text, options)? {
            JsonValue::Object(o) => Ok(o),
            other => Err(JsonError::Parse {
                offset: 0,
                message: format!("expected an object, found {}", other.kind()),
            }),
        }
    }

    /// Number of properties, including any holding `Undefined`.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `true` when `key` is present, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Kind of the value under `key`; `Undefined` when absent.
    pub fn get_value_kind(&self, key: &str) -> ValueKind {
        self.get_value(key).kind()
    }

    /// The value under `key`, `None` when absent.
    pub fn try_get_value(&self, key: &str) -> Option<&JsonValue> {
        self.map.get(key)
    }

    /// The value under `key`, or the shared `Undefined` node.
    pub fn get_value(&self, key: &str) -> &JsonValue {
        self.map.get(key).unwrap_or(&UNDEFINED)
    }

    /// Mutable access to an existing value.
    pub fn get_value_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.map.get_mut(key)
    }

    /// Insert or update. An existing key keeps its position. Returns the previous value.
    pub fn set_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Option<JsonValue> {
        self.map.insert(key.into(), value.into())
    }

    /// Insert a deep copy of a node owned elsewhere.
    pub fn set_value_ref(&mut self, key: impl Into<String>, value: &JsonValue) -> Option<JsonValue> {
        self.map.insert(key.into(), value.clone())
    }

    /// Remove `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.map.shift_remove(key)
    }

    /// Remove every listed key. Returns how many were present.
    pub fn remove_keys<I, S>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .filter(|k| self.map.shift_remove(k.as_ref()).is_some())
            .count()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonValue> {
        self.map.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, JsonValue> {
        self.map.iter_mut()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, JsonValue> {
        self.map.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, JsonValue> {
        self.map.values()
    }

    /// Copy every entry of `other` into `self`. Nested objects present on both
    /// sides are merged recursively; anything else is overwritten.
    pub fn merge(&mut self, other: &JsonObject) {
        for (key, incoming) in other.iter() {
            if let (Some(JsonValue::Object(existing)), JsonValue::Object(nested)) =
                (self.map.get_mut(key), incoming)
            {
                existing.merge(nested);
                continue;
            }
            self.map.insert(key.clone(), incoming.clone());
        }
    }

    /// Serialize with the given indentation.
    pub fn to_json_string(&self, style: IndentStyle) -> String {
        crate::writer::object_to_string(self, &crate::writer::WriteOptions::new(style))
    }

    // Typed access.

    /// Convert the value under `key` with compatible coercion.
    pub fn try_get_as<T: FromJsonValue>(&self, key: &str) -> Option<T> {
        self.try_get_as_with(key, Coercion::Compatible)
    }

    pub fn try_get_as_with<T: FromJsonValue>(&self, key: &str, coercion: Coercion) -> Option<T> {
        self.map.get(key).and_then(|v| T::from_json(v, coercion))
    }

    /// Convert the value under `key`, reporting why it could not be.
    pub fn get_as<T: FromJsonValue>(&self, key: &str) -> Result<T> {
        match self.map.get(key) {
            Some(value) => value.convert(Coercion::Compatible),
            None => Err(JsonError::NotFound(key.to_string())),
        }
    }

    /// Borrow a string value without coercion.
    pub fn try_get_str(&self, key: &str) -> Option<&str> {
        self.get_value(key).as_str()
    }

    pub fn try_get_string_value(&self, key: &str) -> Option<String> {
        self.try_get_as(key)
    }

    pub fn try_get_int32_value(&self, key: &str) -> Option<i32> {
        self.try_get_as(key)
    }

    pub fn try_get_int64_value(&self, key: &str) -> Option<i64> {
        self.try_get_as(key)
    }

    pub fn try_get_double_value(&self, key: &str) -> Option<f64> {
        self.try_get_as(key)
    }

    pub fn try_get_decimal_value(&self, key: &str) -> Option<BigDecimal> {
        self.try_get_as(key)
    }

    pub fn try_get_boolean_value(&self, key: &str) -> Option<bool> {
        self.try_get_as(key)
    }

    pub fn try_get_uuid_value(&self, key: &str) -> Option<Uuid> {
        self.try_get_as(key)
    }

    /// Date-time under `key`; numbers are read as timestamps in the given epoch encoding.
    pub fn try_get_date_time_value(&self, key: &str, epoch: DateEpoch) -> Option<DateTime<Utc>> {
        self.map
            .get(key)
            .and_then(|v| v.to_date_time(epoch, Coercion::Compatible))
    }

    pub fn try_get_object_value(&self, key: &str) -> Option<&JsonObject> {
        self.get_value(key).as_object()
    }

    pub fn try_get_object_value_mut(&mut self, key: &str) -> Option<&mut JsonObject> {
        self.map.get_mut(key).and_then(JsonValue::as_object_mut)
    }

    pub fn try_get_array_value(&self, key: &str) -> Option<&JsonArray> {
        self.get_value(key).as_array()
    }

    pub fn try_get_array_value_mut(&mut self, key: &str) -> Option<&mut JsonArray> {
        self.map.get_mut(key).and_then(JsonValue::as_array_mut)
    }

    pub fn get_string_value(&self, key: &str) -> Result<String> {
        self.get_as(key)
    }

    pub fn get_int32_value(&self, key: &str) -> Result<i32> {
        self.get_as(key)
    }

    pub fn get_int64_value(&self, key: &str) -> Result<i64> {
        self.get_as(key)
    }

    pub fn get_double_value(&self, key: &str) -> Result<f64> {
        self.get_as(key)
    }

    pub fn get_decimal_value(&self, key: &str) -> Result<BigDecimal> {
        self.get_as(key)
    }

    pub fn get_boolean_value(&self, key: &str) -> Result<bool> {
        self.get_as(key)
    }

    pub fn get_uuid_value(&self, key: &str) -> Result<Uuid> {
        self.get_as(key)
    }

    pub fn get_date_time_value(&self, key: &str, epoch: DateEpoch) -> Result<DateTime<Utc>> {
        let value = self
            .map
            .get(key)
            .ok_or_else(|| JsonError::NotFound(key.to_string()))?;
        if value.is_nullish() {
            return Err(JsonError::NullValue);
        }
        value
            .to_date_time(epoch, Coercion::Compatible)
            .ok_or(JsonError::Conversion {
                from: value.kind(),
                to: "DateTime<Utc>",
            })
    }
}

impl Index<&str> for JsonObject {
    type Output = JsonValue;

    fn index(&self, key: &str) -> &JsonValue {
        self.get_value(key)
    }
}

impl FromStr for JsonObject {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self> {
        JsonObject::parse(s)
    }
}

impl std::fmt::Display for JsonObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json_string(IndentStyle::Minified))
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<JsonValue>> Extend<(K, V)> for JsonObject {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set_value(k, v);
        }
    }
}

impl IntoIterator for JsonObject {
    type Item = (String, JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a JsonValue);
    type IntoIter = indexmap::map::Iter<'a, String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
