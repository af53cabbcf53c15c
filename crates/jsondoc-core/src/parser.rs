//! Builds value trees from a [`TokenReader`].
//!
//! The parser consumes exactly the tokens of one value. Comments are skipped
//! wherever a value is expected. Integer literals become `Integer` when they
//! fit in `i64` and `Double` otherwise, so integers beyond 64 bits lose
//! exactness.
//!
//! In lenient mode (the default) a malformed subtree does not abort the whole
//! parse: a token that cannot start a value yields `Null`, a property without
//! a value yields `Null`, and a container cut short by the end of input keeps
//! whatever was read. Strict mode reports each of these as
//! [`JsonError::Parse`].

use crate::array::JsonArray;
use crate::error::{JsonError, Result};
use crate::object::JsonObject;
use crate::token::{TextReader, Token, TokenReader};
use crate::value::JsonValue;

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Fail instead of substituting `Null` for malformed subtrees.
    pub strict: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

struct Parser<'r> {
    reader: &'r mut dyn TokenReader,
    options: ParseOptions,
}

impl Parser<'_> {
    fn fail(&self, message: impl Into<String>) -> JsonError {
        JsonError::Parse {
            offset: self.reader.position(),
            message: message.into(),
        }
    }

    /// Next non-comment token.
    fn next(&mut self) -> Result<Option<Token>> {
        loop {
            match self.reader.read()? {
                Some(Token::Comment(_)) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Strict mode: error. Lenient mode: `Null` in place of the subtree.
    fn malformed(&self, reason: &str) -> Result<JsonValue> {
        if self.options.strict {
            return Err(self.fail(reason));
        }
        tracing::trace!(
            offset = self.reader.position(),
            reason,
            "substituting null for malformed value"
        );
        Ok(JsonValue::Null)
    }

    fn value_from(&mut self, token: Token) -> Result<JsonValue> {
        match token {
            Token::Null => Ok(JsonValue::Null),
            Token::True => Ok(JsonValue::Bool(true)),
            Token::False => Ok(JsonValue::Bool(false)),
            Token::String(s) => Ok(JsonValue::String(s)),
            Token::Number(_) => match (token.as_i64(), token.as_f64()) {
                (Some(i), _) => Ok(JsonValue::Integer(i)),
                (None, Some(d)) => Ok(JsonValue::Double(d)),
                (None, None) => self.malformed("unreadable number"),
            },
            Token::StartObject => self.object().map(JsonValue::Object),
            Token::StartArray => self.array().map(JsonValue::Array),
            Token::EndObject | Token::EndArray | Token::PropertyName(_) => {
                self.malformed("expected a value")
            }
            Token::Comment(_) => unreachable!("comments are skipped by next()"),
        }
    }

    /// Object body; the opening token is already consumed.
    fn object(&mut self) -> Result<JsonObject> {
        let mut object = JsonObject::new();
        loop {
            match self.next()? {
                Some(Token::EndObject) => return Ok(object),
                Some(Token::PropertyName(name)) => {
                    let value = match self.next()? {
                        Some(Token::EndObject) => {
                            let value = self.malformed("property without a value")?;
                            object.set_value(name, value);
                            return Ok(object);
                        }
                        Some(token) => self.value_from(token)?,
                        None => {
                            let value = self.malformed("property without a value")?;
                            object.set_value(name, value);
                            return Ok(object);
                        }
                    };
                    object.set_value(name, value);
                }
                Some(token @ (Token::StartObject | Token::StartArray)) => {
                    // A value where a key belongs: read it to stay in step, then drop it.
                    self.malformed("expected a property name")?;
                    self.value_from(token)?;
                }
                Some(_) => {
                    self.malformed("expected a property name")?;
                }
                None => {
                    self.malformed("unterminated object")?;
                    return Ok(object);
                }
            }
        }
    }

    /// Array body; the opening token is already consumed.
    fn array(&mut self) -> Result<JsonArray> {
        let mut array = JsonArray::new();
        loop {
            match self.next()? {
                Some(Token::EndArray) => return Ok(array),
                Some(token @ (Token::EndObject | Token::PropertyName(_))) => {
                    // Dropped rather than stored: a stray closer has no subtree.
                    self.malformed(&format!("unexpected {token:?} in array"))?;
                }
                Some(token) => array.add(self.value_from(token)?),
                None => {
                    self.malformed("unterminated array")?;
                    return Ok(array);
                }
            }
        }
    }
}

/// Read one value from `reader`, leaving it positioned just past that value.
/// An empty stream yields `Undefined` (lenient) or an error (strict).
pub fn parse_value(reader: &mut dyn TokenReader, options: ParseOptions) -> Result<JsonValue> {
    let mut parser = Parser { reader, options };
    match parser.next()? {
        Some(token) => parser.value_from(token),
        None if options.strict => Err(parser.fail("empty input")),
        None => Ok(JsonValue::Undefined),
    }
}

/// Parse a whole text document. Trailing content other than comments is an error.
pub fn parse_str(text: &str, options: ParseOptions) -> Result<JsonValue> {
    let mut reader = TextReader::new(text);
    let value = parse_value(&mut reader, options)?;
    loop {
        match reader.read()? {
            None => return Ok(value),
            Some(Token::Comment(_)) => continue,
            Some(_) => {
                return Err(JsonError::Parse {
                    offset: reader.position(),
                    message: "unexpected content after the root value".to_string(),
                })
            }
        }
    }
}
