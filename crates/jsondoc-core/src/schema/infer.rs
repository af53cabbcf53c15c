//! Schema inference from type shapes and sample documents.
//!
//! Both walks share a depth budget and a [`SchemaHandler`] hook. The budget
//! drops by one per nested record or object; once it reaches zero the walk
//! emits a bare object (or array) placeholder instead of descending. A type
//! that already appears among its own ancestors becomes a shallow object
//! schema tagged with the type name.
//!
//! Sample-document inference never marks properties as required and never
//! looks inside arrays: one sample cannot tell which keys are optional or
//! what an array's elements have in common.

use super::description::{ArraySchema, ObjectSchema, Schema, SchemaKind};
use super::shape::{DescribeSchema, PropertyShape, TypeRef, TypeShape};
use crate::object::JsonObject;
use crate::value::JsonValue;

use std::any::TypeId;

/// Nesting budget used by [`SchemaBuilder::new`].
pub const DEFAULT_DEPTH: usize = 10;

/// What a schema node was derived from.
#[derive(Debug, Clone, Copy)]
pub enum SchemaSource<'a> {
    Type(TypeRef),
    Value(&'a JsonValue),
    /// Root of [`SchemaBuilder::from_object`].
    Object(&'a JsonObject),
}

/// One step of the inference path, linked to the step that reached it.
#[derive(Debug)]
pub struct Breadcrumb<'a> {
    parent: Option<&'a Breadcrumb<'a>>,
    source: SchemaSource<'a>,
    property: Option<&'a str>,
}

impl<'a> Breadcrumb<'a> {
    pub fn root(source: SchemaSource<'a>) -> Self {
        Self {
            parent: None,
            source,
            property: None,
        }
    }

    pub fn child(&'a self, source: SchemaSource<'a>, property: &'a str) -> Breadcrumb<'a> {
        Breadcrumb {
            parent: Some(self),
            source,
            property: Some(property),
        }
    }

    pub fn parent(&self) -> Option<&Breadcrumb<'a>> {
        self.parent
    }

    pub fn source(&self) -> &SchemaSource<'a> {
        &self.source
    }

    /// Property name that led here; `None` at the root.
    pub fn property(&self) -> Option<&'a str> {
        self.property
    }

    /// Steps from the root; the root itself is 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// This step followed by each ancestor up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Breadcrumb<'a>> {
        std::iter::successors(Some(self), |crumb| crumb.parent)
    }

    /// Whether this step or any ancestor was derived from type `id`.
    pub fn contains_type(&self, id: TypeId) -> bool {
        self.ancestors()
            .any(|crumb| matches!(crumb.source, SchemaSource::Type(ty) if ty.id() == id))
    }

    /// Dotted property path from the root, e.g. `$.order.lines`.
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.ancestors().filter_map(|c| c.property).collect();
        names.reverse();
        let mut path = String::from("$");
        for name in names {
            path.push('.');
            path.push_str(name);
        }
        path
    }
}

/// Hook applied to every schema node the builder produces.
///
/// Return the candidate unchanged, a rewritten schema, or `None` to drop the
/// node. A dropped property or item is left out of its parent; a dropped
/// root becomes [`Schema::any`].
pub trait SchemaHandler {
    fn convert(
        &self,
        source: &SchemaSource<'_>,
        candidate: Schema,
        breadcrumb: &Breadcrumb<'_>,
    ) -> Option<Schema>;
}

/// Keeps every candidate as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHandler;

impl SchemaHandler for IdentityHandler {
    fn convert(
        &self,
        _source: &SchemaSource<'_>,
        candidate: Schema,
        _breadcrumb: &Breadcrumb<'_>,
    ) -> Option<Schema> {
        Some(candidate)
    }
}

impl<F> SchemaHandler for F
where
    F: Fn(&SchemaSource<'_>, Schema, &Breadcrumb<'_>) -> Option<Schema>,
{
    fn convert(
        &self,
        source: &SchemaSource<'_>,
        candidate: Schema,
        breadcrumb: &Breadcrumb<'_>,
    ) -> Option<Schema> {
        self(source, candidate, breadcrumb)
    }
}

/// Derives schema descriptions from types or sample documents.
pub struct SchemaBuilder {
    depth: usize,
    handler: Box<dyn SchemaHandler>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            handler: Box::new(IdentityHandler),
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_handler(mut self, handler: impl SchemaHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// [`SchemaBuilder::with_handler`] for closures, so their argument types
    /// are inferred.
    pub fn with_handler_fn<F>(self, handler: F) -> Self
    where
        F: Fn(&SchemaSource<'_>, Schema, &Breadcrumb<'_>) -> Option<Schema> + 'static,
    {
        self.with_handler(handler)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn from_type<T: DescribeSchema + ?Sized>(&self, description: Option<&str>) -> Schema {
        self.from_type_ref(TypeRef::of::<T>(), description)
    }

    pub fn from_type_ref(&self, ty: TypeRef, description: Option<&str>) -> Schema {
        let (ty, _) = unwrap_type(ty);
        let root = Breadcrumb::root(SchemaSource::Type(ty));
        let candidate = with_description(self.type_candidate(ty, self.depth, &root), description);
        self.finish_root(candidate, &root, description)
    }

    pub fn from_object(&self, object: &JsonObject, description: Option<&str>) -> Schema {
        let root = Breadcrumb::root(SchemaSource::Object(object));
        let candidate = self.object_candidate(object, self.depth, &root);
        self.finish_root(with_description(candidate, description), &root, description)
    }

    pub fn from_value(&self, value: &JsonValue, description: Option<&str>) -> Schema {
        let root = Breadcrumb::root(SchemaSource::Value(value));
        let candidate = self.value_candidate(value, self.depth, &root);
        self.finish_root(with_description(candidate, description), &root, description)
    }

    fn finish_root(&self, candidate: Schema, root: &Breadcrumb<'_>, description: Option<&str>) -> Schema {
        self.handler
            .convert(&root.source, candidate, root)
            .unwrap_or_else(|| with_description(Schema::any(), description))
    }

    // Type walk.

    /// Candidate for an already unwrapped type, before the handler sees it.
    fn type_candidate(&self, ty: TypeRef, budget: usize, crumb: &Breadcrumb<'_>) -> Schema {
        if crumb.parent().is_some_and(|p| p.contains_type(ty.id())) {
            tracing::debug!(ty = ty.name(), path = %crumb.path(), "recursive type, emitting reference");
            return Schema::object().with_tag(ty.name());
        }
        match ty.shape() {
            TypeShape::Any => Schema::any(),
            TypeShape::String => Schema::string(),
            TypeShape::Boolean => Schema::boolean(),
            TypeShape::Integer => Schema::integer(),
            TypeShape::Number => Schema::number(),
            TypeShape::Formatted(format) => Schema::formatted(format),
            TypeShape::Enum(names) => Schema::enumeration(names.iter().copied()),
            TypeShape::JsonObject | TypeShape::Map => Schema::object(),
            TypeShape::JsonArray => Schema::array(),
            TypeShape::Custom(provider) => provider().unwrap_or_else(Schema::any),
            TypeShape::Sequence(item) => {
                if budget == 0 {
                    tracing::debug!(path = %crumb.path(), "depth budget exhausted at sequence");
                    return Schema::array();
                }
                let (item, _) = unwrap_type(item);
                let item_crumb = Breadcrumb {
                    parent: Some(crumb),
                    source: SchemaSource::Type(item),
                    property: None,
                };
                let candidate = self.type_candidate(item, budget, &item_crumb);
                let items = self.handler.convert(&item_crumb.source, candidate, &item_crumb);
                Schema::new(SchemaKind::Array(ArraySchema {
                    items: items.map(Box::new),
                    tuple: Vec::new(),
                }))
            }
            TypeShape::Record(properties) => {
                if budget == 0 {
                    tracing::debug!(ty = ty.name(), path = %crumb.path(), "depth budget exhausted at record");
                    return Schema::object().with_tag(ty.name());
                }
                self.record(&properties, budget, crumb).with_tag(ty.name())
            }
            // unwrap_type strips these before we get here
            TypeShape::Optional(inner) | TypeShape::Wrapper(inner) => {
                let (inner, _) = unwrap_type(inner);
                self.type_candidate(inner, budget, crumb)
            }
        }
    }

    fn record(&self, properties: &[PropertyShape], budget: usize, crumb: &Breadcrumb<'_>) -> Schema {
        let mut object = ObjectSchema::default();
        for property in properties.iter().filter(|p| !p.ignored) {
            let name = property.json_name();
            let (ty, nullable) = unwrap_type(property.ty);
            let child = crumb.child(SchemaSource::Type(ty), name);

            let candidate = match property.custom.and_then(|provider| provider()) {
                Some(custom) => custom,
                None => self.type_candidate(ty, budget - 1, &child),
            };
            let candidate = match (candidate.description.is_none(), property.description) {
                (true, Some(text)) => candidate.with_description(text),
                (_, _) => candidate,
            };

            if let Some(schema) = self.handler.convert(&child.source, candidate, &child) {
                if !(nullable || property.optional) {
                    object.required.push(name.to_string());
                }
                object.properties.insert(name.to_string(), schema);
            }
        }
        Schema::new(SchemaKind::Object(object))
    }

    // Document walk.

    fn value_candidate(&self, value: &JsonValue, budget: usize, crumb: &Breadcrumb<'_>) -> Schema {
        match value {
            JsonValue::Null | JsonValue::Undefined => Schema::null(),
            JsonValue::Bool(_) => Schema::boolean(),
            JsonValue::Integer(_) => Schema::integer(),
            JsonValue::Double(_) | JsonValue::Decimal(_) => Schema::number(),
            JsonValue::String(_) => Schema::string(),
            JsonValue::Array(_) => Schema::array(),
            JsonValue::Object(object) => self.object_candidate(object, budget, crumb),
        }
    }

    fn object_candidate(&self, object: &JsonObject, budget: usize, crumb: &Breadcrumb<'_>) -> Schema {
        if budget == 0 {
            tracing::debug!(path = %crumb.path(), "depth budget exhausted at object");
            return Schema::object();
        }
        let mut schema = ObjectSchema::default();
        for (key, value) in object {
            if value.is_nullish() {
                continue;
            }
            let child = crumb.child(SchemaSource::Value(value), key);
            let candidate = self.value_candidate(value, budget - 1, &child);
            if let Some(property) = self.handler.convert(&child.source, candidate, &child) {
                schema.properties.insert(key.clone(), property);
            }
        }
        Schema::new(SchemaKind::Object(schema))
    }
}

/// Strip `Wrapper` and `Optional` layers, reporting whether any was optional.
fn unwrap_type(mut ty: TypeRef) -> (TypeRef, bool) {
    let mut nullable = false;
    loop {
        match ty.shape() {
            TypeShape::Wrapper(inner) => ty = inner,
            TypeShape::Optional(inner) => {
                nullable = true;
                ty = inner;
            }
            _ => return (ty, nullable),
        }
    }
}

fn with_description(schema: Schema, description: Option<&str>) -> Schema {
    match description {
        Some(text) => schema.with_description(text),
        None => schema,
    }
}
