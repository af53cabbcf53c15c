//! Ordered, heterogeneous JSON array.
//!
//! [`JsonArray::get`] is the bounds-checked accessor and reports
//! [`JsonError::IndexOutOfRange`]; [`JsonArray::try_get`] and indexing answer
//! `Undefined` instead. Writes past the end fail with [`JsonArray::set`] and
//! pad with `null` with [`JsonArray::set_or_extend`].

use crate::convert::{Coercion, DateEpoch, FromJsonValue};
use crate::error::{JsonError, Result};
use crate::object::JsonObject;
use crate::parser::ParseOptions;
use crate::value::{JsonValue, UNDEFINED};
use crate::writer::IndentStyle;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use std::ops::Index;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonArray {
    items: Vec<JsonValue>,
}

impl JsonArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Parse text whose root must be an array.
    pub fn parse(text: &str) -> Result<JsonArray> {
        Self::parse_with(text, ParseOptions::default())
    }

    /// Parse in strict or lenient mode.
    pub fn parse_with(text: &str, options: ParseOptions) -> Result<JsonArray> {
        match JsonValue::parse_with(text, options)? {
            JsonValue::Array(a) => Ok(a),
            other => Err(JsonError::Parse {
                offset: 0,
                message: format!("expected an array, found {}", other.kind()),
            }),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn out_of_range(&self, index: usize) -> JsonError {
        JsonError::IndexOutOfRange {
            index,
            len: self.items.len(),
        }
    }

    /// The element at `index`, or [`JsonError::IndexOutOfRange`].
    pub fn get(&self, index: usize) -> Result<&JsonValue> {
        self.items.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut JsonValue> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(JsonError::IndexOutOfRange { index, len })
    }

    /// The element at `index`, or the shared `Undefined` node.
    pub fn try_get(&self, index: usize) -> &JsonValue {
        self.items.get(index).unwrap_or(&UNDEFINED)
    }

    /// Replace an existing element. Fails past the end.
    pub fn set(&mut self, index: usize, value: impl Into<JsonValue>) -> Result<()> {
        let slot = self.get_mut(index)?;
        *slot = value.into();
        Ok(())
    }

    /// Replace or append, padding any gap with `null`. Fails when the padded
    /// length cannot be represented or allocated.
    pub fn set_or_extend(&mut self, index: usize, value: impl Into<JsonValue>) -> Result<()> {
        let len = self.items.len();
        if index >= len {
            let new_len = index
                .checked_add(1)
                .ok_or(JsonError::IndexOutOfRange { index, len })?;
            self.items
                .try_reserve(new_len - len)
                .map_err(|_| JsonError::IndexOutOfRange { index, len })?;
            self.items.resize(new_len, JsonValue::Null);
        }
        self.set(index, value)
    }

    /// Append one element.
    pub fn add(&mut self, value: impl Into<JsonValue>) {
        self.items.push(value.into());
    }

    /// Append a deep copy of a node owned elsewhere.
    pub fn add_ref(&mut self, value: &JsonValue) {
        self.items.push(value.clone());
    }

    /// Append every item, converting each into a node.
    pub fn add_range<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonValue>,
    {
        self.items.extend(values.into_iter().map(Into::into));
    }

    /// Insert before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: impl Into<JsonValue>) -> Result<()> {
        if index > self.items.len() {
            return Err(self.out_of_range(index));
        }
        self.items.insert(index, value.into());
        Ok(())
    }

    /// Remove and return the element at `index`, shifting later ones down.
    pub fn remove_at(&mut self, index: usize) -> Result<JsonValue> {
        if index >= self.items.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JsonValue> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, JsonValue> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[JsonValue] {
        &self.items
    }

    /// Object elements only, in order.
    pub fn objects(&self) -> impl Iterator<Item = &JsonObject> {
        self.items.iter().filter_map(JsonValue::as_object)
    }

    /// Serialize with the given indentation.
    pub fn to_json_string(&self, style: IndentStyle) -> String {
        crate::writer::array_to_string(self, &crate::writer::WriteOptions::new(style))
    }

    /// Compatible-mode conversion of the element at `index`; `None` when
    /// missing or unconvertible.
    pub fn try_get_as<T: FromJsonValue>(&self, index: usize) -> Option<T> {
        self.try_get_as_with(index, Coercion::Compatible)
    }

    pub fn try_get_as_with<T: FromJsonValue>(&self, index: usize, coercion: Coercion) -> Option<T> {
        self.items.get(index).and_then(|v| T::from_json(v, coercion))
    }

    /// Convert the element at `index`, reporting why it could not be.
    pub fn get_as<T: FromJsonValue>(&self, index: usize) -> Result<T> {
        self.get(index)?.convert(Coercion::Compatible)
    }

    pub fn try_get_string_value(&self, index: usize) -> Option<String> {
        self.try_get_as(index)
    }

    pub fn try_get_int32_value(&self, index: usize) -> Option<i32> {
        self.try_get_as(index)
    }

    pub fn try_get_int64_value(&self, index: usize) -> Option<i64> {
        self.try_get_as(index)
    }

    pub fn try_get_double_value(&self, index: usize) -> Option<f64> {
        self.try_get_as(index)
    }

    pub fn try_get_boolean_value(&self, index: usize) -> Option<bool> {
        self.try_get_as(index)
    }

    pub fn try_get_decimal_value(&self, index: usize) -> Option<BigDecimal> {
        self.try_get_as(index)
    }

    pub fn try_get_uuid_value(&self, index: usize) -> Option<Uuid> {
        self.try_get_as(index)
    }

    /// Date-time at `index`; numbers are read as timestamps in `epoch`.
    pub fn try_get_date_time_value(&self, index: usize, epoch: DateEpoch) -> Option<DateTime<Utc>> {
        self.items
            .get(index)
            .and_then(|v| v.to_date_time(epoch, Coercion::Compatible))
    }

    pub fn get_string_value(&self, index: usize) -> Result<String> {
        self.get_as(index)
    }

    pub fn get_int32_value(&self, index: usize) -> Result<i32> {
        self.get_as(index)
    }

    pub fn get_int64_value(&self, index: usize) -> Result<i64> {
        self.get_as(index)
    }

    pub fn get_double_value(&self, index: usize) -> Result<f64> {
        self.get_as(index)
    }

    pub fn get_boolean_value(&self, index: usize) -> Result<bool> {
        self.get_as(index)
    }

    pub fn get_decimal_value(&self, index: usize) -> Result<BigDecimal> {
        self.get_as(index)
    }

    pub fn get_uuid_value(&self, index: usize) -> Result<Uuid> {
        self.get_as(index)
    }

    pub fn get_date_time_value(&self, index: usize, epoch: DateEpoch) -> Result<DateTime<Utc>> {
        let value = self.get(index)?;
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

    pub fn try_get_object_value(&self, index: usize) -> Option<&JsonObject> {
        self.try_get(index).as_object()
    }

    pub fn try_get_array_value(&self, index: usize) -> Option<&JsonArray> {
        self.try_get(index).as_array()
    }
}

impl Index<usize> for JsonArray {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &JsonValue {
        self.try_get(index)
    }
}

impl FromStr for JsonArray {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self> {
        JsonArray::parse(s)
    }
}

impl std::fmt::Display for JsonArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json_string(IndentStyle::Minified))
    }
}

impl From<Vec<JsonValue>> for JsonArray {
    fn from(items: Vec<JsonValue>) -> Self {
        Self { items }
    }
}

impl From<JsonArray> for Vec<JsonValue> {
    fn from(array: JsonArray) -> Self {
        array.items
    }
}

impl<V: Into<JsonValue>> FromIterator<V> for JsonArray {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<JsonValue>> Extend<V> for JsonArray {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.add_range(iter);
    }
}

impl IntoIterator for JsonArray {
    type Item = JsonValue;
    type IntoIter = std::vec::IntoIter<JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a JsonValue;
    type IntoIter = std::slice::Iter<'a, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_checked_access() {
        let a: JsonArray = [1, 2, 3].into_iter().collect();
        assert_eq!(a.get(2).unwrap(), &JsonValue::Integer(3));
        assert!(matches!(
            a.get(3),
            Err(JsonError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(a.try_get(3).is_undefined());
        assert!(a[10].is_undefined());
    }

    #[test]
    fn set_fails_past_end_but_extend_pads() {
        let mut a = JsonArray::new();
        assert!(a.set(0, 1).is_err());
        a.set_or_extend(2, "x").unwrap();
        assert_eq!(a.to_string(), r#"[null,null,"x"]"#);
        a.set_or_extend(1, 7).unwrap();
        assert_eq!(a.to_string(), r#"[null,7,"x"]"#);
        a.set(0, true).unwrap();
        assert_eq!(a[0], JsonValue::Bool(true));
    }

    #[test]
    fn extend_to_unrepresentable_length_fails() {
        let mut a: JsonArray = [1].into_iter().collect();
        assert!(matches!(
            a.set_or_extend(usize::MAX, 2),
            Err(JsonError::IndexOutOfRange { index: usize::MAX, len: 1 })
        ));
        assert!(a.set_or_extend(usize::MAX / 2, 2).is_err());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn insert_and_remove() {
        let mut a: JsonArray = ["a", "c"].into_iter().collect();
        a.insert(1, "b").unwrap();
        a.insert(3, "d").unwrap();
        assert!(a.insert(9, "z").is_err());
        assert_eq!(a.remove_at(0).unwrap(), JsonValue::from("a"));
        assert!(a.remove_at(5).is_err());
        assert_eq!(a.to_string(), r#"["b","c","d"]"#);
    }

    #[test]
    fn add_range_accepts_mixed_sources() {
        let mut a = JsonArray::new();
        a.add(1);
        a.add_range(vec![JsonValue::from("two"), JsonValue::Double(3.5)]);
        a.add_ref(&JsonValue::Null);
        assert_eq!(a.len(), 4);
        assert_eq!(a.to_string(), r#"[1,"two",3.5,null]"#);
    }

    #[test]
    fn clone_is_deep() {
        let mut a = JsonArray::parse(r#"[{"k": 1}]"#).unwrap();
        let copy = a.clone();
        a.get_mut(0)
            .unwrap()
            .as_object_mut()
            .unwrap()
            .set_value("k", 2);
        assert_eq!(copy[0]["k"], JsonValue::Integer(1));
        assert_eq!(a[0]["k"], JsonValue::Integer(2));
    }

    #[test]
    fn typed_element_access() {
        let a = JsonArray::parse(r#"["5", 6, "x", {"o": 1}]"#).unwrap();
        assert_eq!(a.try_get_int32_value(0), Some(5));
        assert_eq!(a.try_get_string_value(1).as_deref(), Some("6"));
        assert_eq!(a.try_get_int32_value(2), None);
        assert!(a.try_get_object_value(3).is_some());
        assert!(a.get_as::<i32>(2).is_err());
        assert_eq!(a.get_int32_value(0).unwrap(), 5);
        assert!(matches!(
            a.get_int32_value(9),
            Err(JsonError::IndexOutOfRange { index: 9, len: 4 })
        ));
        assert_eq!(a.objects().count(), 1);
    }

    #[test]
    fn throwing_getters_for_decimal_uuid_and_date() {
        let a = JsonArray::parse(
            r#"["12.50", "67e55044-10b1-426f-9247-bb680e5fe0c8", "2024-03-01T00:00:00Z", null, "x"]"#,
        )
        .unwrap();
        assert_eq!(a.get_decimal_value(0).unwrap(), BigDecimal::from_str("12.50").unwrap());
        assert_eq!(a.try_get_decimal_value(4), None);
        assert!(a.get_decimal_value(4).is_err());
        assert_eq!(
            a.get_uuid_value(1).unwrap().to_string(),
            "67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
        assert!(a.try_get_uuid_value(0).is_none());
        assert!(a.get_uuid_value(0).is_err());
        let dt = a.get_date_time_value(2, DateEpoch::default()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(matches!(
            a.get_date_time_value(3, DateEpoch::default()),
            Err(JsonError::NullValue)
        ));
        assert!(matches!(
            a.get_date_time_value(4, DateEpoch::default()),
            Err(JsonError::Conversion { to: "DateTime<Utc>", .. })
        ));
        assert!(matches!(
            a.get_date_time_value(9, DateEpoch::default()),
            Err(JsonError::IndexOutOfRange { index: 9, len: 5 })
        ));
    }
}
