//! Token stream consumed by the parser.
//!
//! [`TokenReader`] is the contract between the document model and whatever
//! produces tokens. [`TextReader`] is the bundled implementation over UTF-8
//! text: it validates the structural grammar (commas, colons, matching
//! brackets) and reports `//` and `/* */` comments as [`Token::Comment`].

use crate::error::{JsonError, Result};

/// A single token of a JSON document. Separators are not tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Comment(String),
    Null,
    True,
    False,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    /// An object key (unescaped).
    PropertyName(String),
    /// A string value (unescaped).
    String(String),
    /// A number, as its raw source text.
    Number(String),
}

impl Token {
    /// The number as `i64`, when the token is an integer literal that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Token::Number(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    /// The number as `f64`. Out-of-range magnitudes become infinities.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Token::Number(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    /// The text of a string or property-name token.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) | Token::PropertyName(s) => Some(s),
            _ => None,
        }
    }
}

/// Forward-only source of tokens.
pub trait TokenReader {
    /// Advance to the next token. Returns `Ok(None)` at end of input.
    fn read(&mut self) -> Result<Option<Token>>;

    /// Byte offset of the reader in its input, used in error reports.
    fn position(&self) -> usize;
}

/// What the reader accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// A value; `close` allows the enclosing array to end here (`[]`).
    Value { close: bool },
    /// A property name; `close` allows the enclosing object to end here (`{}`).
    Key { close: bool },
    CommaOrClose,
    /// The root value is complete; only whitespace and comments may follow.
    End,
}

/// Tokenizer over UTF-8 text.
pub struct TextReader<'a> {
    input: &'a str,
    pos: usize,
    /// `true` for an object frame, `false` for an array frame.
    stack: Vec<bool>,
    expect: Expect,
}

impl<'a> TextReader<'a> {
    pub fn new(input: &'a str) -> Self {
        // A leading byte-order mark is not part of the document.
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            expect: Expect::Value { close: false },
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn error(&self, message: impl Into<String>) -> JsonError {
        JsonError::Syntax {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Skip whitespace and comments without reporting them.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'/') {
                self.read_comment()?;
            } else {
                return Ok(());
            }
        }
    }

    fn read_comment(&mut self) -> Result<String> {
        self.advance();
        match self.advance() {
            Some(b'/') => {
                let start = self.pos;
                while let Some(b) = self.peek() {
                    if b == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
                Ok(self.input[start..self.pos].trim_end_matches('\r').to_string())
            }
            Some(b'*') => {
                let start = self.pos;
                match self.input[start..].find("*/") {
                    Some(end) => {
                        self.pos = start + end + 2;
                        Ok(self.input[start..start + end].to_string())
                    }
                    None => Err(self.error("unterminated comment")),
                }
            }
            _ => Err(self.error("unexpected '/'")),
        }
    }

    /// Mark the current value complete and compute the next expectation.
    fn value_done(&mut self) {
        self.expect = if self.stack.is_empty() {
            Expect::End
        } else {
            Expect::CommaOrClose
        };
    }

    fn close(&mut self, object: bool) -> Result<Token> {
        match self.stack.last() {
            Some(&top) if top == object => {
                self.advance();
                self.stack.pop();
                self.value_done();
                Ok(if object {
                    Token::EndObject
                } else {
                    Token::EndArray
                })
            }
            _ => Err(self.error("mismatched closing bracket")),
        }
    }

    fn read_value(&mut self, close: bool) -> Result<Token> {
        match self.peek() {
            Some(b'{') => {
                self.advance();
                self.stack.push(true);
                self.expect = Expect::Key { close: true };
                Ok(Token::StartObject)
            }
            Some(b'[') => {
                self.advance();
                self.stack.push(false);
                self.expect = Expect::Value { close: true };
                Ok(Token::StartArray)
            }
            Some(b']') if close => self.close(false),
            Some(b'"') => {
                let s = self.read_string()?;
                self.value_done();
                Ok(Token::String(s))
            }
            Some(b'-' | b'0'..=b'9') => {
                let token = self.read_number()?;
                self.value_done();
                Ok(token)
            }
            Some(b't') => self.read_literal("true", Token::True),
            Some(b'f') => self.read_literal("false", Token::False),
            Some(b'n') => self.read_literal("null", Token::Null),
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn read_literal(&mut self, word: &str, token: Token) -> Result<Token> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            self.value_done();
            Ok(token)
        } else {
            Err(self.error(format!("expected '{word}'")))
        }
    }

    fn read_key(&mut self, close: bool) -> Result<Token> {
        match self.peek() {
            Some(b'}') if close => self.close(true),
            Some(b'"') => {
                let name = self.read_string()?;
                self.skip_trivia()?;
                if self.advance() != Some(b':') {
                    return Err(self.error("expected ':' after property name"));
                }
                self.expect = Expect::Value { close: false };
                Ok(Token::PropertyName(name))
            }
            _ => Err(self.error("expected a property name")),
        }
    }

    fn read_string(&mut self) -> Result<String> {
        self.advance();
        let mut out = String::new();
        loop {
            let start = self.pos;
            // Copy runs of plain characters in one go.
            while let Some(b) = self.peek() {
                if b == b'"' || b == b'\\' || b < 0x20 {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.input[start..self.pos]);
            match self.advance() {
                Some(b'"') => return Ok(out),
                Some(b'\\') => out.push(self.read_escape()?),
                Some(_) => return Err(self.error("control character in string")),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn read_escape(&mut self) -> Result<char> {
        match self.advance() {
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\x08'),
            Some(b'f') => Ok('\x0C'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => {
                let high = self.read_hex4()?;
                if (0xD800..=0xDBFF).contains(&high) {
                    if self.advance() != Some(b'\\') || self.advance() != Some(b'u') {
                        return Err(self.error("unpaired surrogate"));
                    }
                    let low = self.read_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(self.error("invalid low surrogate"));
                    }
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined).ok_or_else(|| self.error("invalid code point"));
                }
                char::from_u32(high).ok_or_else(|| self.error("unpaired surrogate"))
            }
            _ => Err(self.error("invalid escape sequence")),
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        // from_str_radix alone would also take a leading `+`.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid unicode escape"));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(value)
    }

    fn read_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - start
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.advance();
        }
        match self.peek() {
            Some(b'0') => {
                self.advance();
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(self.error("leading zero in number"));
                }
            }
            Some(b'1'..=b'9') => {
                self.read_digits();
            }
            _ => return Err(self.error("invalid number")),
        }
        if self.peek() == Some(b'.') {
            self.advance();
            if self.read_digits() == 0 {
                return Err(self.error("expected digits after decimal point"));
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.advance();
            if let Some(b'+' | b'-') = self.peek() {
                self.advance();
            }
            if self.read_digits() == 0 {
                return Err(self.error("expected digits in exponent"));
            }
        }
        Ok(Token::Number(self.input[start..self.pos].to_string()))
    }
}

impl TokenReader for TextReader<'_> {
    fn read(&mut self) -> Result<Option<Token>> {
        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            if b == b'/' {
                return self.read_comment().map(|c| Some(Token::Comment(c)));
            }
            return match self.expect {
                Expect::Value { close } => self.read_value(close).map(Some),
                Expect::Key { close } => self.read_key(close).map(Some),
                Expect::CommaOrClose => match b {
                    b',' => {
                        self.advance();
                        self.expect = match self.stack.last() {
                            Some(true) => Expect::Key { close: false },
                            _ => Expect::Value { close: false },
                        };
                        continue;
                    }
                    b'}' => self.close(true).map(Some),
                    b']' => self.close(false).map(Some),
                    _ => Err(self.error("expected ',' or closing bracket")),
                },
                Expect::End => Err(self.error("unexpected trailing characters")),
            };
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}
