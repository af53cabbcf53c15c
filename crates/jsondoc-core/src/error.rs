//! Error types for parsing, access, coercion and schema operations.
//!
//! Lookups and `try_*` conversions never produce these: they answer with
//! `None` or [`JsonValue::Undefined`](crate::JsonValue::Undefined). Errors are
//! reserved for the throwing accessors, strict parsing and I/O.

use crate::value::ValueKind;
use thiserror::Error;

/// Errors that can occur while reading, accessing or converting JSON nodes.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The text could not be tokenized (reader path).
    /// `offset` is the byte offset where the problem was detected.
    #[error("JSON syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// The token stream did not form a valid value and strict parsing was requested.
    #[error("JSON parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Explicit index access outside the bounds of an array.
    #[error("Index {index} is out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A required property was absent.
    #[error("Property not found: {0}")]
    NotFound(String),

    /// A conversion that requires a value received `null` or undefined.
    #[error("Value is null or undefined")]
    NullValue,

    /// The node exists but cannot be converted to the requested type.
    #[error("Cannot convert {from} value to {to}")]
    Conversion { from: ValueKind, to: &'static str },

    /// A schema JSON object did not describe a supported schema.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Reading or writing the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout jsondoc-core.
pub type Result<T> = std::result::Result<T, JsonError>;
