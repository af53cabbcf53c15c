//! # jsondoc-core
//!
//! In-memory JSON document model with order-preserving objects, typed
//! coercion and JSON Schema inference.
//!
//! Every node is a [`JsonValue`]: `Null`, `Undefined`, `Bool`, `Integer`,
//! `Double`, `Decimal`, `String`, `Object` or `Array`. Lookups that miss
//! answer `Undefined` rather than failing, and typed getters answer `None`
//! when a value is missing or cannot be converted.
//!
//! ## Quick start
//!
//! ```rust
//! use jsondoc_core::{IndentStyle, JsonObject, JsonValue};
//!
//! let mut order = JsonObject::parse(r#"{"id": 7, "total": "19.90", "paid": false}"#).unwrap();
//! assert_eq!(order.try_get_int32_value("id"), Some(7));
//! assert_eq!(order.try_get_double_value("total"), Some(19.9));
//! assert!(order["missing"].is_undefined());
//!
//! order.set_value("paid", true);
//! order.set_value("note", JsonValue::Null);
//! assert_eq!(
//!     order.to_json_string(IndentStyle::Minified),
//!     r#"{"id":7,"total":"19.90","paid":true,"note":null}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the [`JsonValue`] sum type and its shared singletons
//! - [`object`], [`array`]: ordered containers with typed accessors
//! - [`convert`]: strict and compatible coercion to Rust types
//! - [`token`], [`parser`]: token stream and tree builder
//! - [`writer`]: minified and indented output
//! - [`schema`]: schema descriptions and inference from types or documents
//! - [`query`]: filtering, projection and field stripping
//! - [`lines`]: JSON Lines
//! - [`error`]: [`JsonError`]

pub mod array;
pub mod convert;
pub mod error;
pub mod lines;
pub mod object;
pub mod parser;
pub mod query;
pub mod schema;
mod serde_impl;
pub mod token;
pub mod value;
pub mod writer;

pub use array::JsonArray;
pub use convert::{Coercion, DateEpoch, FromJsonValue};
pub use error::{JsonError, Result};
pub use lines::{parse_json_lines, to_json_lines, MIME_JSON, MIME_JSON_LINES};
pub use object::JsonObject;
pub use parser::{parse_str, parse_value, ParseOptions};
pub use query::{
    filter_by, group_by_string, project, select_values, strip_fields, try_select_values, where_eq,
};
pub use schema::{Schema, SchemaBuilder, SchemaKind};
pub use token::{TextReader, Token, TokenReader};
pub use value::{JsonValue, ValueKind, FALSE, MAX_SAFE_INTEGER, NULL, TRUE, UNDEFINED};
pub use writer::{IndentStyle, JsonWriter, TextWriter, WriteOptions};
