//! Static type descriptions used by schema inference.
//!
//! A type opts in by implementing [`DescribeSchema`]. Records list their
//! properties with [`PropertyShape`]; everything else maps to one of the
//! scalar or container shapes. Implementations for the standard library,
//! `chrono`, `uuid`, `url` and `bigdecimal` types are provided here.
//!
//! # Example
//!
//! ```
//! use jsondoc_core::schema::{DescribeSchema, PropertyShape, TypeShape};
//!
//! struct Invoice {
//!     number: String,
//!     lines: Vec<Line>,
//!     note: Option<String>,
//! }
//!
//! struct Line {
//!     sku: String,
//!     qty: u32,
//! }
//!
//! impl DescribeSchema for Invoice {
//!     fn describe() -> TypeShape {
//!         TypeShape::Record(vec![
//!             PropertyShape::new::<String>("number"),
//!             PropertyShape::new::<Vec<Line>>("lines"),
//!             PropertyShape::new::<Option<String>>("note").description("Free text"),
//!         ])
//!     }
//! }
//!
//! impl DescribeSchema for Line {
//!     fn describe() -> TypeShape {
//!         TypeShape::Record(vec![
//!             PropertyShape::new::<String>("sku").alias("SKU"),
//!             PropertyShape::new::<u32>("qty"),
//!         ])
//!     }
//! }
//! ```

use super::description::Schema;
use crate::array::JsonArray;
use crate::object::JsonObject;
use crate::value::JsonValue;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Supplies a schema directly, bypassing structural inspection.
pub type SchemaProvider = fn() -> Option<Schema>;

/// A type that can describe its own JSON shape.
pub trait DescribeSchema: 'static {
    fn describe() -> TypeShape;
}

/// Identity and shape of a type, cheap to copy through the inference walk.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    describe: fn() -> TypeShape,
}

impl TypeRef {
    pub fn of<T: DescribeSchema + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            describe: T::describe,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> TypeShape {
        (self.describe)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone)]
pub enum TypeShape {
    /// Any JSON value.
    Any,
    String,
    Boolean,
    Integer,
    Number,
    /// A string with a `format` hint such as `uuid` or `date-time`.
    Formatted(&'static str),
    /// A string restricted to the listed names.
    Enum(&'static [&'static str]),
    JsonObject,
    JsonArray,
    /// String-keyed dictionary; described as an object without properties.
    Map,
    Sequence(TypeRef),
    /// May be null or absent; properties of this shape are not required.
    Optional(TypeRef),
    /// Transparent container such as `Box` or `Arc`.
    Wrapper(TypeRef),
    Record(Vec<PropertyShape>),
    /// The type supplies its own schema. `None` falls back to [`TypeShape::Any`].
    Custom(SchemaProvider),
}

#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub name: &'static str,
    /// Serialized name, used instead of `name` when present.
    pub alias: Option<&'static str>,
    pub ty: TypeRef,
    pub description: Option<&'static str>,
    pub ignored: bool,
    pub optional: bool,
    pub custom: Option<SchemaProvider>,
}

impl PropertyShape {
    pub fn new<T: DescribeSchema + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            ty: TypeRef::of::<T>(),
            description: None,
            ignored: false,
            optional: false,
            custom: None,
        }
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Leave the property out of the schema entirely.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Keep the property but drop it from `required`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn custom(mut self, provider: SchemaProvider) -> Self {
        self.custom = Some(provider);
        self
    }

    pub fn json_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

macro_rules! describe_as {
    ($shape:expr => $($t:ty),* $(,)?) => {
        $(
            impl DescribeSchema for $t {
                fn describe() -> TypeShape {
                    $shape
                }
            }
        )*
    };
}

describe_as!(TypeShape::String => String, str, char);
describe_as!(TypeShape::Boolean => bool);
describe_as!(TypeShape::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!(TypeShape::Number => f32, f64, BigDecimal);
describe_as!(TypeShape::Formatted("uuid") => Uuid);
describe_as!(TypeShape::Formatted("uri") => Url);
describe_as!(TypeShape::Formatted("date-time") =>
    DateTime<Utc>, DateTime<FixedOffset>, DateTime<Local>, NaiveDateTime);
describe_as!(TypeShape::Formatted("date") => NaiveDate);
describe_as!(TypeShape::Formatted("time") => NaiveTime);
describe_as!(TypeShape::Any => JsonValue);
describe_as!(TypeShape::JsonObject => JsonObject);
describe_as!(TypeShape::JsonArray => JsonArray);

macro_rules! describe_wrapper {
    ($variant:ident => $($t:ident),*) => {
        $(
            impl<T: DescribeSchema + ?Sized> DescribeSchema for $t<T> {
                fn describe() -> TypeShape {
                    TypeShape::$variant(TypeRef::of::<T>())
                }
            }
        )*
    };
}

describe_wrapper!(Wrapper => Box, Rc, Arc);

macro_rules! describe_sequence {
    ($($t:ident),*) => {
        $(
            impl<T: DescribeSchema> DescribeSchema for $t<T> {
                fn describe() -> TypeShape {
                    TypeShape::Sequence(TypeRef::of::<T>())
                }
            }
        )*
    };
}

describe_sequence!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: DescribeSchema> DescribeSchema for HashSet<T> {
    fn describe() -> TypeShape {
        TypeShape::Sequence(TypeRef::of::<T>())
    }
}

impl<T: DescribeSchema> DescribeSchema for [T] {
    fn describe() -> TypeShape {
        TypeShape::Sequence(TypeRef::of::<T>())
    }
}

impl<T: DescribeSchema, const N: usize> DescribeSchema for [T; N] {
    fn describe() -> TypeShape {
        TypeShape::Sequence(TypeRef::of::<T>())
    }
}

impl<T: DescribeSchema> DescribeSchema for Option<T> {
    fn describe() -> TypeShape {
        TypeShape::Optional(TypeRef::of::<T>())
    }
}

impl<T> DescribeSchema for Cow<'static, T>
where
    T: DescribeSchema + ToOwned + ?Sized,
    T::Owned: 'static,
{
    fn describe() -> TypeShape {
        TypeShape::Wrapper(TypeRef::of::<T>())
    }
}

impl<K: 'static, V: 'static> DescribeSchema for HashMap<K, V> {
    fn describe() -> TypeShape {
        TypeShape::Map
    }
}

impl<K: 'static, V: 'static> DescribeSchema for BTreeMap<K, V> {
    fn describe() -> TypeShape {
        TypeShape::Map
    }
}

impl<K: 'static, V: 'static> DescribeSchema for IndexMap<K, V> {
    fn describe() -> TypeShape {
        TypeShape::Map
    }
}
