//! Schema description tree and its JSON form.

use crate::array::JsonArray;
use crate::error::{JsonError, Result};
use crate::object::JsonObject;
use crate::value::JsonValue;

use indexmap::IndexMap;

/// One node of a schema description.
///
/// `tag` is an opaque identifier for the node's origin (a type name, for
/// schemas derived from types). It is not part of the JSON form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub kind: SchemaKind,
    pub description: Option<String>,
    /// `$id`
    pub id: Option<String>,
    /// `$schema`
    pub dialect: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaKind {
    /// No constraint; written without a `type` keyword.
    #[default]
    Any,
    Object(ObjectSchema),
    Array(ArraySchema),
    String(StringSchema),
    Number,
    Integer,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Schema>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    /// Schema shared by every element.
    pub items: Option<Box<Schema>>,
    /// Per-position schemas; written as an `items` array when non-empty.
    pub tuple: Vec<Schema>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringSchema {
    pub format: Option<String>,
    pub enum_values: Vec<String>,
}

impl SchemaKind {
    /// The `type` keyword, `None` for [`SchemaKind::Any`].
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            SchemaKind::Any => None,
            SchemaKind::Object(_) => Some("object"),
            SchemaKind::Array(_) => Some("array"),
            SchemaKind::String(_) => Some("string"),
            SchemaKind::Number => Some("number"),
            SchemaKind::Integer => Some("integer"),
            SchemaKind::Boolean => Some("boolean"),
            SchemaKind::Null => Some("null"),
        }
    }
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// An object schema with no properties.
    pub fn object() -> Self {
        Self::new(SchemaKind::Object(ObjectSchema::default()))
    }

    /// An array schema with no item schema.
    pub fn array() -> Self {
        Self::new(SchemaKind::Array(ArraySchema::default()))
    }

    pub fn array_of(items: Schema) -> Self {
        Self::new(SchemaKind::Array(ArraySchema {
            items: Some(Box::new(items)),
            tuple: Vec::new(),
        }))
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String(StringSchema::default()))
    }

    pub fn formatted(format: impl Into<String>) -> Self {
        Self::new(SchemaKind::String(StringSchema {
            format: Some(format.into()),
            enum_values: Vec::new(),
        }))
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SchemaKind::String(StringSchema {
            format: None,
            enum_values: values.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number)
    }

    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn null() -> Self {
        Self::new(SchemaKind::Null)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn is_any(&self) -> bool {
        matches!(self.kind, SchemaKind::Any)
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArraySchema> {
        match &self.kind {
            SchemaKind::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringSchema> {
        match &self.kind {
            SchemaKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Named property of an object schema.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.as_object().and_then(|o| o.properties.get(name))
    }

    /// Levels of nesting below this node; a scalar has depth 0.
    pub fn depth(&self) -> usize {
        match &self.kind {
            SchemaKind::Object(o) => o
                .properties
                .values()
                .map(|p| p.depth() + 1)
                .max()
                .unwrap_or(0),
            SchemaKind::Array(a) => a
                .items
                .iter()
                .map(|s| s.as_ref())
                .chain(a.tuple.iter())
                .map(|s| s.depth() + 1)
                .max()
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// The JSON form: `$schema`, `$id`, `type`, `description`, then the
    /// kind-specific keywords.
    pub fn to_json(&self) -> JsonObject {
        let mut out = JsonObject::new();
        if let Some(dialect) = &self.dialect {
            out.set_value("$schema", dialect.as_str());
        }
        if let Some(id) = &self.id {
            out.set_value("$id", id.as_str());
        }
        if let Some(name) = self.kind.type_name() {
            out.set_value("type", name);
        }
        if let Some(description) = &self.description {
            out.set_value("description", description.as_str());
        }
        match &self.kind {
            SchemaKind::Object(o) => {
                if !o.properties.is_empty() {
                    let properties: JsonObject = o
                        .properties
                        .iter()
                        .map(|(name, schema)| (name.clone(), schema.to_json()))
                        .collect();
                    out.set_value("properties", properties);
                }
                if !o.required.is_empty() {
                    out.set_value("required", o.required.iter().cloned().collect::<JsonArray>());
                }
            }
            SchemaKind::Array(a) => {
                if !a.tuple.is_empty() {
                    let tuple: JsonArray = a.tuple.iter().map(Schema::to_json).collect();
                    out.set_value("items", tuple);
                } else if let Some(items) = &a.items {
                    out.set_value("items", items.to_json());
                }
            }
            SchemaKind::String(s) => {
                if let Some(format) = &s.format {
                    out.set_value("format", format.as_str());
                }
                if !s.enum_values.is_empty() {
                    out.set_value("enum", s.enum_values.iter().cloned().collect::<JsonArray>());
                }
            }
            _ => {}
        }
        out
    }

    /// Read the JSON form back, dispatching on `type`. A missing `type`
    /// gives [`SchemaKind::Any`].
    pub fn from_json(json: &JsonObject) -> Result<Schema> {
        let kind = match json.try_get_value("type") {
            None => SchemaKind::Any,
            Some(JsonValue::String(name)) => match name.as_str() {
                "object" => SchemaKind::Object(read_object(json)?),
                "array" => SchemaKind::Array(read_array(json)?),
                "string" => SchemaKind::String(read_string(json)?),
                "number" => SchemaKind::Number,
                "integer" => SchemaKind::Integer,
                "boolean" => SchemaKind::Boolean,
                "null" => SchemaKind::Null,
                other => return Err(JsonError::Schema(format!("unknown schema type '{other}'"))),
            },
            Some(other) => {
                return Err(JsonError::Schema(format!(
                    "'type' must be a string, found {}",
                    other.kind()
                )))
            }
        };
        Ok(Schema {
            kind,
            description: optional_string(json, "description")?,
            id: optional_string(json, "$id")?,
            dialect: optional_string(json, "$schema")?,
            tag: None,
        })
    }
}

fn optional_string(json: &JsonObject, key: &str) -> Result<Option<String>> {
    match json.get_value(key) {
        v if v.is_nullish() => Ok(None),
        JsonValue::String(s) => Ok(Some(s.clone())),
        other => Err(JsonError::Schema(format!(
            "'{key}' must be a string, found {}",
            other.kind()
        ))),
    }
}

fn string_list(json: &JsonObject, key: &str) -> Result<Vec<String>> {
    match json.get_value(key) {
        v if v.is_nullish() => Ok(Vec::new()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    JsonError::Schema(format!("'{key}' entries must be strings"))
                })
            })
            .collect(),
        other => Err(JsonError::Schema(format!(
            "'{key}' must be an array, found {}",
            other.kind()
        ))),
    }
}

fn nested(value: &JsonValue, context: &str) -> Result<Schema> {
    match value {
        JsonValue::Object(o) => Schema::from_json(o),
        other => Err(JsonError::Schema(format!(
            "{context} must be a schema object, found {}",
            other.kind()
        ))),
    }
}

fn read_object(json: &JsonObject) -> Result<ObjectSchema> {
    let mut properties = IndexMap::new();
    match json.get_value("properties") {
        v if v.is_nullish() => {}
        JsonValue::Object(props) => {
            for (name, value) in props {
                properties.insert(name.clone(), nested(value, &format!("property '{name}'"))?);
            }
        }
        other => {
            return Err(JsonError::Schema(format!(
                "'properties' must be an object, found {}",
                other.kind()
            )))
        }
    }
    Ok(ObjectSchema {
        properties,
        required: string_list(json, "required")?,
    })
}

fn read_array(json: &JsonObject) -> Result<ArraySchema> {
    match json.get_value("items") {
        v if v.is_nullish() => Ok(ArraySchema::default()),
        JsonValue::Array(tuple) => Ok(ArraySchema {
            items: None,
            tuple: tuple
                .iter()
                .map(|item| nested(item, "'items' entry"))
                .collect::<Result<_>>()?,
        }),
        other => Ok(ArraySchema {
            items: Some(Box::new(nested(other, "'items'")?)),
            tuple: Vec::new(),
        }),
    }
}

fn read_string(json: &JsonObject) -> Result<StringSchema> {
    Ok(StringSchema {
        format: optional_string(json, "format")?,
        enum_values: string_list(json, "enum")?,
    })
}
