//! Serialization of value nodes through the [`JsonWriter`] capability.
//!
//! [`TextWriter`] renders minified or indented UTF-8 text. Non-finite doubles
//! are written as the strings `"NaN"`, `"Infinity"` and `"-Infinity"`, since
//! bare `NaN` is not JSON. `Undefined` never reaches the output as a property:
//! an object entry holding it is skipped, and anywhere else it is written as
//! `null`.

use crate::array::JsonArray;
use crate::error::Result;
use crate::object::JsonObject;
use crate::value::JsonValue;

use bigdecimal::BigDecimal;
use std::io;

/// Whitespace policy for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// No insignificant whitespace.
    #[default]
    Minified,
    /// One entry per line, indented by the given number of spaces per level.
    Indented(usize),
}

/// Options for text output.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub style: IndentStyle,
    /// Write integers beyond ±(2^53 − 1) as strings so JavaScript consumers keep every digit.
    pub quote_unsafe_integers: bool,
}

impl WriteOptions {
    pub fn new(style: IndentStyle) -> Self {
        Self {
            style,
            quote_unsafe_integers: false,
        }
    }

    pub fn indented() -> Self {
        Self::new(IndentStyle::Indented(2))
    }
}

/// Sink for a stream of JSON write events.
pub trait JsonWriter {
    fn write_null(&mut self) -> Result<()>;
    fn write_bool(&mut self, value: bool) -> Result<()>;
    fn write_i64(&mut self, value: i64) -> Result<()>;
    fn write_f64(&mut self, value: f64) -> Result<()>;
    fn write_decimal(&mut self, value: &BigDecimal) -> Result<()>;
    fn write_string(&mut self, value: &str) -> Result<()>;
    fn write_start_object(&mut self) -> Result<()>;
    fn write_end_object(&mut self) -> Result<()>;
    fn write_start_array(&mut self) -> Result<()>;
    fn write_end_array(&mut self) -> Result<()>;
    fn write_property_name(&mut self, name: &str) -> Result<()>;
}

/// Sentinel string for a non-finite double.
pub fn non_finite_sentinel(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_negative() {
        "-Infinity"
    } else {
        "Infinity"
    }
}

/// Canonical text of a finite double. Exponent form only for very large or small magnitudes.
pub fn format_f64(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..1e16).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

/// Plain decimal literal, switching to exponent form only when the plain form
/// would need more than 20 padding zeros. The scale is preserved (`1.50` stays `1.50`).
pub fn format_decimal(value: &BigDecimal) -> String {
    const MAX_PADDING: i64 = 20;

    let (unscaled, scale) = value.as_bigint_and_exponent();
    let text = unscaled.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let len = digits.len() as i64;
    let exponent = len - 1 - scale;

    let body = if scale <= 0 && -scale <= MAX_PADDING {
        format!("{digits}{}", "0".repeat((-scale) as usize))
    } else if scale > 0 && scale < len {
        let split = (len - scale) as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else if scale >= len && scale - len <= MAX_PADDING {
        format!("0.{}{digits}", "0".repeat((scale - len) as usize))
    } else {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits.to_string()
        };
        format!("{mantissa}e{exponent}")
    };
    format!("{sign}{body}")
}

/// Append `value` as a quoted, escaped JSON string.
pub fn write_escaped(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Renders write events as JSON text.
pub struct TextWriter {
    out: String,
    style: IndentStyle,
    /// One entry per open container: `true` until its first child is written.
    open: Vec<bool>,
    after_property_name: bool,
}

impl TextWriter {
    pub fn new(style: IndentStyle) -> Self {
        Self {
            out: String::new(),
            style,
            open: Vec::new(),
            after_property_name: false,
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn newline(&mut self) {
        if let IndentStyle::Indented(width) = self.style {
            self.out.push('\n');
            self.out.push_str(&" ".repeat(width * self.open.len()));
        }
    }

    /// Separator and indentation owed before the next value or property name.
    fn before_value(&mut self) {
        if self.after_property_name {
            self.after_property_name = false;
            return;
        }
        if let Some(first) = self.open.last_mut() {
            let was_first = *first;
            *first = false;
            if !was_first {
                self.out.push(',');
            }
            self.newline();
        }
    }

    fn end_container(&mut self, close: char) {
        let empty = self.open.pop().unwrap_or(true);
        if !empty {
            self.newline();
        }
        self.out.push(close);
    }
}

impl JsonWriter for TextWriter {
    fn write_null(&mut self) -> Result<()> {
        self.before_value();
        self.out.push_str("null");
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.before_value();
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.before_value();
        self.out.push_str(&value.to_string());
        Ok(())
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return self.write_string(non_finite_sentinel(value));
        }
        self.before_value();
        self.out.push_str(&format_f64(value));
        Ok(())
    }

    fn write_decimal(&mut self, value: &BigDecimal) -> Result<()> {
        self.before_value();
        self.out.push_str(&format_decimal(value));
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.before_value();
        write_escaped(&mut self.out, value);
        Ok(())
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.before_value();
        self.out.push('{');
        self.open.push(true);
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.end_container('}');
        Ok(())
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.before_value();
        self.out.push('[');
        self.open.push(true);
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.end_container(']');
        Ok(())
    }

    fn write_property_name(&mut self, name: &str) -> Result<()> {
        self.before_value();
        write_escaped(&mut self.out, name);
        self.out.push(':');
        if matches!(self.style, IndentStyle::Indented(_)) {
            self.out.push(' ');
        }
        self.after_property_name = true;
        Ok(())
    }
}

/// Emit `value` as write events.
pub fn write_value(
    value: &JsonValue,
    writer: &mut dyn JsonWriter,
    options: &WriteOptions,
) -> Result<()> {
    match value {
        JsonValue::Null | JsonValue::Undefined => writer.write_null(),
        JsonValue::Bool(b) => writer.write_bool(*b),
        JsonValue::Integer(n) if options.quote_unsafe_integers && !value.is_safe_integer() => {
            writer.write_string(&n.to_string())
        }
        JsonValue::Integer(n) => writer.write_i64(*n),
        JsonValue::Double(d) => writer.write_f64(*d),
        JsonValue::Decimal(d) => writer.write_decimal(d),
        JsonValue::String(s) => writer.write_string(s),
        JsonValue::Object(o) => write_object(o, writer, options),
        JsonValue::Array(a) => write_array(a, writer, options),
    }
}

pub fn write_object(
    object: &JsonObject,
    writer: &mut dyn JsonWriter,
    options: &WriteOptions,
) -> Result<()> {
    writer.write_start_object()?;
    for (key, child) in object.iter() {
        if child.is_undefined() {
            continue;
        }
        writer.write_property_name(key)?;
        write_value(child, writer, options)?;
    }
    writer.write_end_object()
}

pub fn write_array(
    array: &JsonArray,
    writer: &mut dyn JsonWriter,
    options: &WriteOptions,
) -> Result<()> {
    writer.write_start_array()?;
    for child in array.iter() {
        write_value(child, writer, options)?;
    }
    writer.write_end_array()
}

/// Render `value` as text.
pub fn to_string(value: &JsonValue, options: &WriteOptions) -> String {
    let mut writer = TextWriter::new(options.style);
    // TextWriter never fails.
    let _ = write_value(value, &mut writer, options);
    writer.into_string()
}

pub fn object_to_string(object: &JsonObject, options: &WriteOptions) -> String {
    let mut writer = TextWriter::new(options.style);
    let _ = write_object(object, &mut writer, options);
    writer.into_string()
}

pub fn array_to_string(array: &JsonArray, options: &WriteOptions) -> String {
    let mut writer = TextWriter::new(options.style);
    let _ = write_array(array, &mut writer, options);
    writer.into_string()
}

/// Render `value` as text into an I/O sink.
pub fn to_writer<W: io::Write>(
    value: &JsonValue,
    mut sink: W,
    options: &WriteOptions,
) -> Result<()> {
    sink.write_all(to_string(value, options).as_bytes())?;
    Ok(())
}
