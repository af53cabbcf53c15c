//! Coercion between JSON kinds and Rust types.
//!
//! [`Coercion::Strict`] converts only from the target's natural kind.
//! [`Coercion::Compatible`] additionally applies these cross-kind rules:
//!
//! - string → number: trimmed, locale-invariant parse
//! - string → bool: `true`/`false` (any case), `1`/`0`
//! - number → bool: nonzero is `true`
//! - number or bool → string: canonical JSON formatting
//! - number → date-time: a timestamp in the caller's [`DateEpoch`]
//!
//! Integer targets never truncate: out-of-range values and doubles with a
//! fractional part fail the conversion.
//!
//! Date-times also come from objects laid out as `year`, `month`, `day`,
//! `hour`, `minute`, `second`, `millisecond` and `kind`, in both modes.

use crate::error::{JsonError, Result};
use crate::object::JsonObject;
use crate::value::{JsonValue, ValueKind};
use crate::writer;

use bigdecimal::BigDecimal;
use chrono::{
    DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use std::str::FromStr;
use uuid::Uuid;

/// Conversion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// The value's kind must be the target's natural kind.
    Strict,
    /// Defined cross-kind conversions apply.
    #[default]
    Compatible,
}

impl Coercion {
    pub fn is_strict(self) -> bool {
        self == Coercion::Strict
    }
}

/// How a number is read as a point in time. Chosen by the caller, never guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateEpoch {
    /// Milliseconds since 1970-01-01T00:00:00Z, as JavaScript `Date` uses.
    #[default]
    JavaScriptMillis,
    /// Seconds since 1970-01-01T00:00:00Z.
    UnixSeconds,
    /// 100-nanosecond intervals since 1601-01-01T00:00:00Z (Windows file time).
    FileTime,
}

/// Seconds between 1601-01-01 and 1970-01-01.
const FILE_TIME_UNIX_OFFSET: i64 = 11_644_473_600;
const FILE_TIME_TICKS_PER_SECOND: i64 = 10_000_000;
/// Largest accepted time-zone offset, in seconds (30 hours).
const MAX_OFFSET_SECONDS: i64 = 30 * 3600;

/// Types that can be read out of a [`JsonValue`].
pub trait FromJsonValue: Sized {
    /// Name used in conversion errors.
    const TYPE_NAME: &'static str;

    /// `None` when the value cannot be converted under `coercion`.
    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self>;
}

impl JsonValue {
    pub fn try_convert<T: FromJsonValue>(&self, coercion: Coercion) -> Option<T> {
        T::from_json(self, coercion)
    }

    /// Like [`JsonValue::try_convert`], but `null`, `undefined` and failed
    /// conversions are errors.
    pub fn convert<T: FromJsonValue>(&self, coercion: Coercion) -> Result<T> {
        if self.is_nullish() {
            return Err(JsonError::NullValue);
        }
        T::from_json(self, coercion).ok_or(JsonError::Conversion {
            from: self.kind(),
            to: T::TYPE_NAME,
        })
    }

    /// Read a point in time. Strings are ISO-8601 (or RFC 2822); objects use the
    /// date-field layout; numbers need compatible coercion and are read in `epoch`.
    pub fn to_date_time(&self, epoch: DateEpoch, coercion: Coercion) -> Option<DateTime<Utc>> {
        match self {
            JsonValue::String(s) => parse_date_time(s).or_else(|| {
                if coercion.is_strict() {
                    return None;
                }
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    from_epoch_i64(n, epoch)
                } else {
                    trimmed.parse::<f64>().ok().and_then(|d| from_epoch_f64(d, epoch))
                }
            }),
            JsonValue::Object(o) => date_from_fields(o),
            JsonValue::Integer(n) if !coercion.is_strict() => from_epoch_i64(*n, epoch),
            JsonValue::Double(d) if !coercion.is_strict() => from_epoch_f64(*d, epoch),
            JsonValue::Decimal(d) if !coercion.is_strict() => {
                match decimal_to_i128(d).and_then(|n| i64::try_from(n).ok()) {
                    Some(n) => from_epoch_i64(n, epoch),
                    None if integer_digits(d) > I128_DIGITS => None,
                    None => d.to_f64().and_then(|f| from_epoch_f64(f, epoch)),
                }
            }
            _ => None,
        }
    }
}

/// Whole-number view of a value, `None` when it has a fractional part.
fn integral(value: &JsonValue, coercion: Coercion) -> Option<i128> {
    match value {
        JsonValue::Integer(n) => Some(i128::from(*n)),
        JsonValue::Double(d) => {
            if d.is_finite() && d.fract() == 0.0 {
                d.to_i128()
            } else {
                None
            }
        }
        JsonValue::Decimal(d) => decimal_to_i128(d),
        JsonValue::String(s) if !coercion.is_strict() => {
            let s = s.trim();
            s.parse::<i128>()
                .ok()
                .or_else(|| BigDecimal::from_str(s).ok().and_then(|d| decimal_to_i128(&d)))
        }
        _ => None,
    }
}

/// Decimal digits in `i128::MAX`.
const I128_DIGITS: i64 = 39;

/// Digits left of the decimal point, from the stored digits and scale alone.
fn integer_digits(d: &BigDecimal) -> i64 {
    let (_, scale) = d.as_bigint_and_exponent();
    i64::try_from(d.digits()).unwrap_or(i64::MAX).saturating_sub(scale)
}

/// Exact `i128` view of a decimal. Exponents are bounded before rescaling so
/// that `1e200000000` fails without materializing the integer.
pub(crate) fn decimal_to_i128(d: &BigDecimal) -> Option<i128> {
    if d.is_zero() {
        return Some(0);
    }
    let (_, scale) = d.as_bigint_and_exponent();
    let digits = i64::try_from(d.digits()).ok()?;
    // More scale than digits leaves a nonzero value below one.
    if scale > digits || digits.saturating_sub(scale) > I128_DIGITS {
        return None;
    }
    if !d.is_integer() {
        return None;
    }
    d.to_i128()
}

macro_rules! integer_from_json {
    ($($t:ty),*) => {
        $(
            impl FromJsonValue for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
                    integral(value, coercion).and_then(|n| <$t>::try_from(n).ok())
                }
            }
        )*
    };
}

integer_from_json!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromJsonValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
        match value {
            JsonValue::Integer(_) | JsonValue::Double(_) | JsonValue::Decimal(_) => value.as_f64(),
            JsonValue::String(s) if !coercion.is_strict() => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromJsonValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
        let d = f64::from_json(value, coercion)?;
        if d.is_finite() && d.abs() > f64::from(f32::MAX) {
            return None;
        }
        Some(d as f32)
    }
}

impl FromJsonValue for BigDecimal {
    const TYPE_NAME: &'static str = "BigDecimal";

    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
        match value {
            JsonValue::Integer(n) => Some(BigDecimal::from(*n)),
            // Shortest round-trip text, so 0.1 stays 0.1 rather than its binary expansion.
            JsonValue::Double(d) if d.is_finite() => BigDecimal::from_str(&d.to_string())
                .ok()
                .or_else(|| BigDecimal::from_f64(*d)),
            JsonValue::Decimal(d) => Some(d.clone()),
            JsonValue::String(s) if !coercion.is_strict() => BigDecimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }
}

impl FromJsonValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
        match value {
            JsonValue::Bool(b) => Some(*b),
            _ if coercion.is_strict() => None,
            JsonValue::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") || s == "1" {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") || s == "0" {
                    Some(false)
                } else {
                    None
                }
            }
            JsonValue::Integer(n) => Some(*n != 0),
            JsonValue::Double(d) if !d.is_nan() => Some(*d != 0.0),
            JsonValue::Decimal(d) => Some(!d.is_zero()),
            _ => None,
        }
    }
}

impl FromJsonValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
        match value {
            JsonValue::String(s) => Some(s.clone()),
            _ if coercion.is_strict() => None,
            JsonValue::Bool(b) => Some(b.to_string()),
            JsonValue::Integer(n) => Some(n.to_string()),
            JsonValue::Double(d) if d.is_finite() => Some(writer::format_f64(*d)),
            JsonValue::Double(d) => Some(writer::non_finite_sentinel(*d).to_string()),
            JsonValue::Decimal(d) => Some(writer::format_decimal(d)),
            _ => None,
        }
    }
}

impl FromJsonValue for Uuid {
    const TYPE_NAME: &'static str = "Uuid";

    fn from_json(value: &JsonValue, _coercion: Coercion) -> Option<Self> {
        value.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok())
    }
}

impl FromJsonValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "DateTime<Utc>";

    /// Numbers are read as JavaScript millisecond timestamps; use
    /// [`JsonValue::to_date_time`] to pick another epoch.
    fn from_json(value: &JsonValue, coercion: Coercion) -> Option<Self> {
        value.to_date_time(DateEpoch::JavaScriptMillis, coercion)
    }
}

impl FromJsonValue for JsonValue {
    const TYPE_NAME: &'static str = "JsonValue";

    fn from_json(value: &JsonValue, _coercion: Coercion) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromJsonValue for JsonObject {
    const TYPE_NAME: &'static str = "JsonObject";

    fn from_json(value: &JsonValue, _coercion: Coercion) -> Option<Self> {
        value.as_object().cloned()
    }
}

/// ISO-8601 / RFC 3339 first, then common variants without an offset (read as
/// UTC), a bare date, and finally RFC 2822.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text.replacen(' ', "T", 1)) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn from_epoch_i64(n: i64, epoch: DateEpoch) -> Option<DateTime<Utc>> {
    match epoch {
        DateEpoch::JavaScriptMillis => DateTime::from_timestamp_millis(n),
        DateEpoch::UnixSeconds => DateTime::from_timestamp(n, 0),
        DateEpoch::FileTime => {
            let seconds = n.div_euclid(FILE_TIME_TICKS_PER_SECOND) - FILE_TIME_UNIX_OFFSET;
            let nanos = n.rem_euclid(FILE_TIME_TICKS_PER_SECOND) * 100;
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
    }
}

fn from_epoch_f64(d: f64, epoch: DateEpoch) -> Option<DateTime<Utc>> {
    if !d.is_finite() {
        return None;
    }
    let seconds = match epoch {
        DateEpoch::JavaScriptMillis => d / 1000.0,
        DateEpoch::UnixSeconds => d,
        DateEpoch::FileTime => {
            d / FILE_TIME_TICKS_PER_SECOND as f64 - FILE_TIME_UNIX_OFFSET as f64
        }
    };
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole.to_i64()?, nanos)
}

/// A date field, `default` when absent. Present but unreadable fields fail.
fn date_field(object: &JsonObject, key: &str, default: Option<i64>) -> Option<i64> {
    match object.get_value(key) {
        v if v.is_nullish() => default,
        v => i64::from_json(v, Coercion::Compatible),
    }
}

/// Build a UTC instant from the `year`/`month`/…/`kind` object layout.
fn date_from_fields(object: &JsonObject) -> Option<DateTime<Utc>> {
    let year = date_field(object, "year", None)?;
    let month = date_field(object, "month", None)?;
    let day = date_field(object, "day", None)?;
    let hour = date_field(object, "hour", Some(0))?;
    let minute = date_field(object, "minute", Some(0))?;
    let second = date_field(object, "second", Some(0))?;
    let millisecond = date_field(object, "millisecond", Some(0))?;

    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || !(0..=23).contains(&hour)
        || !(0..=59).contains(&minute)
        || !(0..=59).contains(&second)
        || !(0..=1000).contains(&millisecond)
    {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        month as u32,
        day as u32,
    )?;
    let time = NaiveTime::from_hms_opt(hour as u32, minute as u32, second as u32)?;
    // 1000 ms is accepted and carries into the next second.
    let local = date
        .and_time(time)
        .checked_add_signed(Duration::milliseconds(millisecond))?;

    match object.get_value("kind") {
        v if v.is_nullish() => Some(Utc.from_utc_datetime(&local)),
        JsonValue::String(kind) => match kind.trim().to_ascii_lowercase().as_str() {
            "utc" | "z" | "gmt" => Some(Utc.from_utc_datetime(&local)),
            "local" => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            other => {
                let offset = parse_offset(other)?;
                shift_to_utc(local, offset)
            }
        },
        v if v.kind() == ValueKind::Integer => {
            let hours = v.as_i64()?;
            let offset = hours.checked_mul(3600)?;
            if offset.abs() > MAX_OFFSET_SECONDS {
                return None;
            }
            shift_to_utc(local, offset)
        }
        _ => None,
    }
}

/// Offsets can exceed what `FixedOffset` accepts, so shift the naive time directly.
fn shift_to_utc(local: NaiveDateTime, offset_seconds: i64) -> Option<DateTime<Utc>> {
    local
        .checked_sub_signed(Duration::seconds(offset_seconds))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Offset in seconds east of UTC from `+0800`, `+08:00`, `+8`, `-05:30`,
/// `GMT+08:00` or `UTC-5`. Input must already be lowercase.
pub(crate) fn parse_offset(text: &str) -> Option<i64> {
    let text = text
        .strip_prefix("gmt")
        .or_else(|| text.strip_prefix("utc"))
        .unwrap_or(text)
        .trim();
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => (rest.get(..2)?, rest.get(2..)?),
        None => (rest, "0"),
    };
    if hours.is_empty()
        || hours.len() > 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let total = hours * 3600 + minutes * 60;
    if total > MAX_OFFSET_SECONDS {
        return None;
    }
    Some(sign * total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn obj(text: &str) -> JsonValue {
        JsonValue::parse(text).unwrap()
    }

    #[test]
    fn strict_numeric_from_string_always_fails() {
        for s in ["123", "0", "-5", "abc"] {
            let v = JsonValue::from(s);
            assert_eq!(v.try_convert::<i32>(Coercion::Strict), None);
            assert_eq!(v.try_convert::<f64>(Coercion::Strict), None);
        }
    }

    #[test]
    fn compatible_numeric_from_string() {
        assert_eq!(JsonValue::from("123").try_convert::<i32>(Coercion::Compatible), Some(123));
        assert_eq!(JsonValue::from(" 42 ").try_convert::<u8>(Coercion::Compatible), Some(42));
        assert_eq!(JsonValue::from("abc").try_convert::<i32>(Coercion::Compatible), None);
        assert_eq!(JsonValue::from("1e3").try_convert::<i64>(Coercion::Compatible), Some(1000));
        assert_eq!(JsonValue::from("1.5").try_convert::<f64>(Coercion::Compatible), Some(1.5));
        assert_eq!(JsonValue::from("1.5").try_convert::<i64>(Coercion::Compatible), None);
    }

    #[test]
    fn integer_overflow_fails() {
        assert_eq!(JsonValue::Integer(300).try_convert::<i8>(Coercion::Strict), None);
        assert_eq!(JsonValue::Integer(100).try_convert::<i8>(Coercion::Strict), Some(100));
        assert_eq!(JsonValue::Integer(-1).try_convert::<u32>(Coercion::Strict), None);
        assert_eq!(JsonValue::Double(1e20).try_convert::<i64>(Coercion::Strict), None);
        assert_eq!(JsonValue::Double(7.0).try_convert::<i64>(Coercion::Strict), Some(7));
        assert_eq!(JsonValue::Double(7.5).try_convert::<i64>(Coercion::Strict), None);
        assert_eq!(JsonValue::Double(1e39).try_convert::<f32>(Coercion::Strict), None);
    }

    #[test]
    fn boolean_rules() {
        let c = Coercion::Compatible;
        assert_eq!(JsonValue::from("TRUE").try_convert::<bool>(c), Some(true));
        assert_eq!(JsonValue::from("false").try_convert::<bool>(c), Some(false));
        assert_eq!(JsonValue::from("1").try_convert::<bool>(c), Some(true));
        assert_eq!(JsonValue::from("0").try_convert::<bool>(c), Some(false));
        assert_eq!(JsonValue::from("yes").try_convert::<bool>(c), None);
        assert_eq!(JsonValue::Integer(5).try_convert::<bool>(c), Some(true));
        assert_eq!(JsonValue::Double(0.0).try_convert::<bool>(c), Some(false));
        assert_eq!(JsonValue::from("true").try_convert::<bool>(Coercion::Strict), None);
        assert_eq!(JsonValue::Integer(1).try_convert::<bool>(Coercion::Strict), None);
    }

    #[test]
    fn string_rules() {
        let c = Coercion::Compatible;
        assert_eq!(JsonValue::Integer(5).try_convert::<String>(c).as_deref(), Some("5"));
        assert_eq!(JsonValue::Double(2.5).try_convert::<String>(c).as_deref(), Some("2.5"));
        assert_eq!(JsonValue::Bool(true).try_convert::<String>(c).as_deref(), Some("true"));
        assert_eq!(JsonValue::Double(f64::NAN).try_convert::<String>(c).as_deref(), Some("NaN"));
        assert_eq!(JsonValue::Integer(5).try_convert::<String>(Coercion::Strict), None);
        assert_eq!(JsonValue::Null.try_convert::<String>(c), None);
    }

    #[test]
    fn sentinel_strings_read_back_as_non_finite() {
        let nan = JsonValue::from("NaN").try_convert::<f64>(Coercion::Compatible).unwrap();
        assert!(nan.is_nan());
        let inf = JsonValue::from("-Infinity")
            .try_convert::<f64>(Coercion::Compatible)
            .unwrap();
        assert_eq!(inf, f64::NEG_INFINITY);
    }

    #[test]
    fn decimal_from_double_keeps_short_form() {
        let d = JsonValue::Double(0.1).try_convert::<BigDecimal>(Coercion::Strict).unwrap();
        assert_eq!(d, BigDecimal::from_str("0.1").unwrap());
    }

    #[test]
    fn convert_distinguishes_null_from_mismatch() {
        assert!(matches!(JsonValue::Null.convert::<i32>(Coercion::Compatible), Err(JsonError::NullValue)));
        assert!(matches!(JsonValue::Undefined.convert::<i32>(Coercion::Compatible), Err(JsonError::NullValue)));
        assert!(matches!(
            JsonValue::from("x").convert::<i32>(Coercion::Compatible),
            Err(JsonError::Conversion { to: "i32", .. })
        ));
    }

    #[test]
    fn uuid_from_string() {
        let v = JsonValue::from("67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(v.try_convert::<Uuid>(Coercion::Strict).is_some());
        assert!(JsonValue::from("nope").try_convert::<Uuid>(Coercion::Compatible).is_none());
    }

    #[test]
    fn iso_strings() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        for s in [
            "2024-03-01T12:30:00Z",
            "2024-03-01T14:30:00+02:00",
            "2024-03-01 12:30:00",
            "2024-03-01T12:30",
        ] {
            assert_eq!(parse_date_time(s), Some(expected), "{s}");
        }
        assert_eq!(
            parse_date_time("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date_time("not a date"), None);
    }

    #[test]
    fn epochs_are_caller_selected() {
        let expected = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let c = Coercion::Compatible;
        assert_eq!(
            JsonValue::Integer(1_609_459_200_000).to_date_time(DateEpoch::JavaScriptMillis, c),
            Some(expected)
        );
        assert_eq!(
            JsonValue::Integer(1_609_459_200).to_date_time(DateEpoch::UnixSeconds, c),
            Some(expected)
        );
        assert_eq!(
            JsonValue::Integer(132_539_328_000_000_000).to_date_time(DateEpoch::FileTime, c),
            Some(expected)
        );
        assert_eq!(
            JsonValue::Double(1_609_459_200.5).to_date_time(DateEpoch::UnixSeconds, c),
            Some(expected + Duration::milliseconds(500))
        );
        assert_eq!(
            JsonValue::Integer(1_609_459_200).to_date_time(DateEpoch::UnixSeconds, Coercion::Strict),
            None
        );
    }

    #[test]
    fn date_object_with_offset() {
        let v = obj(r#"{"year": 2024, "month": 1, "day": 1, "kind": "+02:00"}"#);
        let dt = v.to_date_time(DateEpoch::default(), Coercion::Strict).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 12, 31, 22, 0, 0).unwrap());
    }

    #[test]
    fn date_object_field_ranges() {
        let bad = [
            r#"{"year": 2024, "month": 13, "day": 1}"#,
            r#"{"year": 2024, "month": 0, "day": 1}"#,
            r#"{"year": 2024, "month": 2, "day": 30}"#,
            r#"{"year": 2024, "month": 1, "day": 1, "hour": 24}"#,
            r#"{"year": 2024, "month": 1, "day": 1, "minute": 60}"#,
            r#"{"year": 2024, "month": 1, "day": 1, "millisecond": 1001}"#,
            r#"{"year": 2024, "month": 1, "day": 1, "kind": "+31:00"}"#,
            r#"{"year": 2024, "month": 1, "day": 1, "kind": "mars"}"#,
            r#"{"year": "x", "month": 1, "day": 1}"#,
            r#"{"month": 1, "day": 1}"#,
        ];
        for text in bad {
            assert_eq!(
                obj(text).to_date_time(DateEpoch::default(), Coercion::Compatible),
                None,
                "{text}"
            );
        }
    }

    #[test]
    fn date_object_millisecond_carry_and_utc_kind() {
        let v = obj(
            r#"{"year": 2024, "month": 5, "day": 6, "hour": 7, "minute": 8, "second": 59, "millisecond": 1000, "kind": "UTC"}"#,
        );
        let dt = v.to_date_time(DateEpoch::default(), Coercion::Compatible).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 6, 7, 9, 0).unwrap());
        assert_eq!(dt.nanosecond(), 0);
    }

    #[test]
    fn offset_forms() {
        assert_eq!(parse_offset("+0800"), Some(8 * 3600));
        assert_eq!(parse_offset("+08:00"), Some(8 * 3600));
        assert_eq!(parse_offset("gmt+08:00"), Some(8 * 3600));
        assert_eq!(parse_offset("utc-05:30"), Some(-(5 * 3600 + 30 * 60)));
        assert_eq!(parse_offset("+8"), Some(8 * 3600));
        assert_eq!(parse_offset("+30:00"), Some(30 * 3600));
        assert_eq!(parse_offset("-30:00"), Some(-30 * 3600));
        assert_eq!(parse_offset("+30:01"), None);
        assert_eq!(parse_offset("+08:60"), None);
        assert_eq!(parse_offset("0800"), None);
        assert_eq!(parse_offset("+1\u{e9}1"), None);
        assert_eq!(parse_offset("+\u{e9}12"), None);
        assert_eq!(parse_offset("+08:3\u{e9}"), None);
    }

    #[test]
    fn date_object_with_multibyte_kind_fails() {
        let v = obj(r#"{"year": 2024, "month": 1, "day": 1, "kind": "+1\u00e91"}"#);
        assert_eq!(v.to_date_time(DateEpoch::default(), Coercion::Compatible), None);
    }

    #[test]
    fn huge_exponents_fail_without_rescaling() {
        let start = std::time::Instant::now();
        let c = Coercion::Compatible;
        for text in ["1e200000000", "-7e200000000", "1e-200000000", "0e-200000000", "1e40"] {
            let v = JsonValue::from(text);
            let zero = text.starts_with('0');
            assert_eq!(v.try_convert::<i32>(c), zero.then_some(0), "{text}");
            assert_eq!(v.try_convert::<u64>(c), zero.then_some(0), "{text}");
            let d = JsonValue::Decimal(BigDecimal::from_str(text).unwrap());
            assert_eq!(d.try_convert::<i64>(Coercion::Strict), zero.then_some(0), "{text}");
        }
        let big = JsonValue::Decimal(BigDecimal::from_str("1e200000000").unwrap());
        assert_eq!(big.to_date_time(DateEpoch::UnixSeconds, c), None);
        assert_eq!(big.try_convert::<bool>(c), Some(true));
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn decimal_integers_near_the_i128_edge() {
        let c = Coercion::Compatible;
        assert_eq!(JsonValue::from("1.2e3").try_convert::<i64>(c), Some(1200));
        assert_eq!(JsonValue::from("12000e-3").try_convert::<i64>(c), Some(12));
        assert_eq!(JsonValue::from("0.5").try_convert::<i64>(c), None);
        let max = JsonValue::Decimal(BigDecimal::from_str("1.7e38").unwrap());
        assert_eq!(max.try_convert::<i64>(c), None);
        assert!(integral(&max, c).is_some());
    }
}
