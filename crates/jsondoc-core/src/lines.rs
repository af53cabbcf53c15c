//! JSON Lines: one minified object per line.

use crate::error::{JsonError, Result};
use crate::object::JsonObject;
use crate::parser::{self, ParseOptions};
use crate::value::JsonValue;
use crate::writer::{self, IndentStyle, WriteOptions};

pub const MIME_JSON: &str = "application/json";
pub const MIME_JSON_LINES: &str = "application/jsonl";

/// Join minified objects with `\n`; an absent item becomes a `null` line.
/// No trailing newline.
pub fn to_json_lines<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a Option<JsonObject>>,
{
    let options = WriteOptions::new(IndentStyle::Minified);
    items
        .into_iter()
        .map(|item| match item {
            Some(object) => writer::object_to_string(object, &options),
            None => "null".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inverse of [`to_json_lines`]. Blank lines are skipped and `null` lines
/// yield `None`; any other non-object line is an error.
pub fn parse_json_lines(text: &str) -> Result<Vec<Option<JsonObject>>> {
    let mut items = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        let line_offset = offset;
        offset += line.len() + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = parser::parse_str(line, ParseOptions::strict()).map_err(|e| match e {
            JsonError::Syntax { offset, message } => JsonError::Syntax {
                offset: line_offset + offset,
                message,
            },
            JsonError::Parse { offset, message } => JsonError::Parse {
                offset: line_offset + offset,
                message,
            },
            other => other,
        })?;
        match value {
            JsonValue::Object(object) => items.push(Some(object)),
            JsonValue::Null => items.push(None),
            other => {
                return Err(JsonError::Parse {
                    offset: line_offset,
                    message: format!("expected an object or null line, found {}", other.kind()),
                })
            }
        }
    }
    Ok(items)
}
