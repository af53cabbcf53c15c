//! Schema descriptions and the engine that infers them.
//!
//! - [`description`]: the schema tree and its JSON form
//! - [`shape`]: static type descriptions ([`DescribeSchema`])
//! - [`infer`]: [`SchemaBuilder`], which walks a type or a sample document

pub mod description;
pub mod infer;
pub mod shape;

pub use description::{ArraySchema, ObjectSchema, Schema, SchemaKind, StringSchema};
pub use infer::{
    Breadcrumb, IdentityHandler, SchemaBuilder, SchemaHandler, SchemaSource, DEFAULT_DEPTH,
};
pub use shape::{DescribeSchema, PropertyShape, SchemaProvider, TypeRef, TypeShape};
