//! Filtering, projection and bulk extraction over sequences of objects.
//!
//! Extraction goes through the coercion engine, so `select_values::<i32>`
//! with [`Coercion::Compatible`] also picks up `"42"`.
//!
//! [`strip_fields`] removes properties by dotted path:
//!
//! - `"etag"`: the top-level `etag`
//! - `"meta.etag"`: `etag` inside `meta`
//! - `"*.etag"`: `etag` at any depth
//! - `"lines.*.sku"`: `sku` in every element of `lines`
//!
//! Arrays do not consume path segments, so `"lines.sku"` also reaches into
//! each element of a `lines` array.

use crate::convert::{Coercion, FromJsonValue};
use crate::object::JsonObject;
use crate::value::JsonValue;

use indexmap::IndexMap;

/// Objects whose value under `key` satisfies `predicate`. A missing key is
/// passed to the predicate as `Undefined`.
pub fn filter_by<'a, I, P>(items: I, key: &str, mut predicate: P) -> Vec<&'a JsonObject>
where
    I: IntoIterator<Item = &'a JsonObject>,
    P: FnMut(&JsonValue) -> bool,
{
    items
        .into_iter()
        .filter(|o| predicate(o.get_value(key)))
        .collect()
}

/// Objects whose value under `key` equals `expected`. Numbers compare by value.
pub fn where_eq<'a, I>(items: I, key: &str, expected: &JsonValue) -> Vec<&'a JsonObject>
where
    I: IntoIterator<Item = &'a JsonObject>,
{
    filter_by(items, key, |v| v == expected)
}

/// Converted values under `key`, skipping objects where the key is missing
/// or the conversion fails.
pub fn select_values<'a, T, I>(items: I, key: &str, coercion: Coercion) -> Vec<T>
where
    T: FromJsonValue,
    I: IntoIterator<Item = &'a JsonObject>,
{
    items
        .into_iter()
        .filter_map(|o| o.try_get_as_with(key, coercion))
        .collect()
}

/// Like [`select_values`], but all or nothing: `None` as soon as one object
/// lacks the key or holds an unconvertible value.
pub fn try_select_values<'a, T, I>(items: I, key: &str, coercion: Coercion) -> Option<Vec<T>>
where
    T: FromJsonValue,
    I: IntoIterator<Item = &'a JsonObject>,
{
    items
        .into_iter()
        .map(|o| o.try_get_as_with(key, coercion))
        .collect()
}

/// Copies of each object holding only `keys`, in the order given. Keys an
/// object lacks are left out of its copy.
pub fn project<'a, I>(items: I, keys: &[&str]) -> Vec<JsonObject>
where
    I: IntoIterator<Item = &'a JsonObject>,
{
    items
        .into_iter()
        .map(|o| {
            keys.iter()
                .filter_map(|k| o.try_get_value(k).map(|v| (*k, v.clone())))
                .collect()
        })
        .collect()
}

/// Buckets keyed by the string form of each object's value under `key`, in
/// first-seen order. Objects whose value has no string form are skipped.
pub fn group_by_string<'a, I>(items: I, key: &str) -> IndexMap<String, Vec<JsonObject>>
where
    I: IntoIterator<Item = &'a JsonObject>,
{
    let mut groups: IndexMap<String, Vec<JsonObject>> = IndexMap::new();
    for object in items {
        if let Some(group) = object.try_get_as_with::<String>(key, Coercion::Compatible) {
            groups.entry(group).or_default().push(object.clone());
        }
    }
    groups
}

/// One dotted pattern, split into segments; `*` matches any single key.
#[derive(Debug, Clone)]
struct Pattern<'a> {
    segments: Vec<&'a str>,
}

impl<'a> Pattern<'a> {
    fn parse(pattern: &'a str) -> Self {
        Self {
            segments: pattern.split('.').filter(|s| !s.is_empty()).collect(),
        }
    }

    fn tail(&self, skip: usize) -> Self {
        Self {
            segments: self.segments[skip..].to_vec(),
        }
    }
}

/// Copy of `value` without the properties matching `patterns`.
pub fn strip_fields(value: &JsonValue, patterns: &[&str]) -> JsonValue {
    let parsed: Vec<Pattern<'_>> = patterns
        .iter()
        .map(|p| Pattern::parse(p))
        .filter(|p| !p.segments.is_empty())
        .collect();
    if parsed.is_empty() {
        return value.clone();
    }
    strip(value, &parsed)
}

fn strip(value: &JsonValue, patterns: &[Pattern<'_>]) -> JsonValue {
    match value {
        JsonValue::Object(o) => JsonValue::Object(strip_object(o, patterns)),
        JsonValue::Array(a) => JsonValue::Array(a.iter().map(|item| strip(item, patterns)).collect()),
        other => other.clone(),
    }
}

fn strip_object(object: &JsonObject, patterns: &[Pattern<'_>]) -> JsonObject {
    let mut out = JsonObject::with_capacity(object.len());
    'keys: for (key, child) in object {
        let mut nested = Vec::new();
        for pattern in patterns {
            let (first, rest) = match pattern.segments.split_first() {
                Some(split) => split,
                None => continue,
            };
            if *first == "*" {
                match rest {
                    [] => continue 'keys,
                    [only] if *only == key.as_str() => continue 'keys,
                    [next, ..] if *next == key.as_str() || *next == "*" => nested.push(pattern.tail(2)),
                    _ => {}
                }
                // a leading wildcard keeps looking further down
                nested.push(pattern.clone());
            } else if *first == key.as_str() {
                if rest.is_empty() {
                    continue 'keys;
                }
                nested.push(pattern.tail(1));
            }
        }
        let child = if nested.is_empty() {
            child.clone()
        } else {
            strip(child, &nested)
        };
        out.set_value(key.clone(), child);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::JsonArray;

    fn orders() -> JsonArray {
        JsonArray::parse(
            r#"[
                {"id": 1, "status": "open", "total": "19.5", "region": "eu"},
                {"id": 2, "status": "closed", "total": 7, "region": "us"},
                {"id": 3, "status": "open", "total": "n/a", "region": "eu"},
                {"id": 4.0, "status": "open"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn filters_by_value() {
        let orders = orders();
        let open = where_eq(orders.objects(), "status", &JsonValue::from("open"));
        assert_eq!(open.len(), 3);
        let four = where_eq(orders.objects(), "id", &JsonValue::Integer(4));
        assert_eq!(four.len(), 1);
        let no_region = filter_by(orders.objects(), "region", JsonValue::is_undefined);
        assert_eq!(no_region.len(), 1);
    }

    #[test]
    fn select_skips_but_try_select_fails() {
        let orders = orders();
        let totals: Vec<f64> = select_values(orders.objects(), "total", Coercion::Compatible);
        assert_eq!(totals, [19.5, 7.0]);
        let strict: Vec<f64> = select_values(orders.objects(), "total", Coercion::Strict);
        assert_eq!(strict, [7.0]);
        assert_eq!(
            try_select_values::<i64, _>(orders.objects(), "id", Coercion::Strict),
            Some(vec![1, 2, 3, 4])
        );
        assert_eq!(
            try_select_values::<f64, _>(orders.objects(), "total", Coercion::Compatible),
            None
        );
    }

    #[test]
    fn project_keeps_requested_order() {
        let orders = orders();
        let rows = project(orders.objects(), &["region", "id"]);
        assert_eq!(rows[0].to_string(), r#"{"region":"eu","id":1}"#);
        assert_eq!(rows[3].to_string(), r#"{"id":4}"#);
    }

    #[test]
    fn groups_in_first_seen_order() {
        let orders = orders();
        let groups = group_by_string(orders.objects(), "region");
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["eu", "us"]);
        assert_eq!(groups["eu"].len(), 2);
    }

    #[test]
    fn strips_paths_and_wildcards() {
        let doc = JsonValue::parse(
            r#"{"etag": "x", "name": "n", "meta": {"etag": "y", "keep": 1},
                "lines": [{"sku": "a", "etag": "z", "qty": 1}, {"sku": "b", "qty": 2}]}"#,
        )
        .unwrap();
        let out = strip_fields(&doc, &["*.etag", "lines.*.qty"]);
        assert_eq!(
            out.to_string(),
            r#"{"name":"n","meta":{"keep":1},"lines":[{"sku":"a"},{"sku":"b"}]}"#
        );
        let out = strip_fields(&doc, &["meta.keep", "lines.sku"]);
        assert_eq!(out["meta"].to_string(), r#"{"etag":"y"}"#);
        assert!(out["lines"][0]["sku"].is_undefined());
        assert_eq!(strip_fields(&doc, &[]), doc);
    }
}
