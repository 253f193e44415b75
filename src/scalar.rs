//! Scalar payloads and the conversion contract exposed by value nodes
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::conversion_error;
use crate::decimal::Decimal;
use crate::errors::{Details, ParserError, ParserResult, Stage};
use crate::tags::TypeTag;

/// A [Scalar] holds a single payload drawn from the closed set of primitive types known to the
/// type tag registry. Payloads are immutable by convention: the only way to change one is to
/// construct a fresh scalar
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The null payload
    Null,
    /// Canonical boolean
    Boolean(bool),
    /// A single unicode character
    Char(char),
    /// Signed byte
    SByte(i8),
    /// Unsigned byte
    Byte(u8),
    /// 16-bit signed integer
    Int16(i16),
    /// 16-bit unsigned integer
    UInt16(u16),
    /// 32-bit signed integer
    Int32(i32),
    /// 32-bit unsigned integer
    UInt32(u32),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit unsigned integer
    UInt64(u64),
    /// Single precision float
    Single(f32),
    /// Double precision float
    Double(f64),
    /// Exact decimal
    Decimal(Decimal),
    /// Date/time instant
    DateTime(DateTime<Utc>),
    /// Canonical string
    String(String),
    /// Raw byte buffer
    Bytes(Vec<u8>),
}

/// Round a float to the nearest integer (half away from zero) and range check the result
fn float_to_i128(value: f64) -> Option<i128> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if rounded >= i128::MIN as f64 && rounded <= i128::MAX as f64 {
        Some(rounded as i128)
    } else {
        None
    }
}

/// Generates one integral conversion accessor. All integral targets share the same shape:
/// nulls convert to zero, booleans to one/zero, characters through their code point, other
/// integrals through range-checked conversion, floats and decimals through rounding, and
/// strings through a straight parse of the trimmed representation
macro_rules! integral_conversion {
    ($name : ident, $target : ty, $tag : expr) => {
        /// Convert the payload to the target integral type
        pub fn $name(&self) -> ParserResult<$target> {
            let fail = || ParserError {
                stage: Stage::Conversion,
                details: Details::ConversionFailed {
                    from: self.tag(),
                    to: $tag,
                },
                coords: None,
            };
            match self {
                Scalar::Null => Ok(0),
                Scalar::Boolean(b) => Ok(if *b { 1 } else { 0 }),
                Scalar::Char(c) => <$target>::try_from(*c as u32).map_err(|_| fail()),
                Scalar::SByte(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::Byte(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::Int16(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::UInt16(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::Int32(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::UInt32(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::Int64(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::UInt64(v) => <$target>::try_from(*v).map_err(|_| fail()),
                Scalar::Single(v) => float_to_i128(*v as f64)
                    .and_then(|i| <$target>::try_from(i).ok())
                    .ok_or_else(fail),
                Scalar::Double(v) => float_to_i128(*v)
                    .and_then(|i| <$target>::try_from(i).ok())
                    .ok_or_else(fail),
                Scalar::Decimal(d) => <$target>::try_from(d.round_i128()).map_err(|_| fail()),
                Scalar::String(s) => s.trim().parse::<$target>().map_err(|_| fail()),
                Scalar::DateTime(_) | Scalar::Bytes(_) => Err(fail()),
            }
        }
    };
}

impl Scalar {
    /// The registry tag for this payload
    pub fn tag(&self) -> TypeTag {
        TypeTag::of(self)
    }

    /// A payload is empty if it is null or the empty string. Zero and `false` are *not* empty
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Convert the payload to a boolean. A literal table is consulted before the generic
    /// conversion rule: the strings `"false"`, `"no"`, `"0"` and the empty string convert to
    /// `false`, whilst `"true"`, `"yes"` and `"1"` convert to `true` (case-insensitively).
    /// Numerics convert through the generic non-zero rule; anything else fails
    pub fn as_bool(&self) -> ParserResult<bool> {
        match self {
            Scalar::Null => Ok(false),
            Scalar::Boolean(b) => Ok(*b),
            Scalar::SByte(v) => Ok(*v != 0),
            Scalar::Byte(v) => Ok(*v != 0),
            Scalar::Int16(v) => Ok(*v != 0),
            Scalar::UInt16(v) => Ok(*v != 0),
            Scalar::Int32(v) => Ok(*v != 0),
            Scalar::UInt32(v) => Ok(*v != 0),
            Scalar::Int64(v) => Ok(*v != 0),
            Scalar::UInt64(v) => Ok(*v != 0),
            Scalar::Single(v) => Ok(*v != 0.0),
            Scalar::Double(v) => Ok(*v != 0.0),
            Scalar::Decimal(d) => Ok(d.mantissa != 0),
            Scalar::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("false")
                    || trimmed.eq_ignore_ascii_case("no")
                    || trimmed == "0"
                {
                    Ok(false)
                } else if trimmed.eq_ignore_ascii_case("true")
                    || trimmed.eq_ignore_ascii_case("yes")
                    || trimmed == "1"
                {
                    Ok(true)
                } else {
                    conversion_error!(self.tag(), TypeTag::Boolean)
                }
            }
            Scalar::Char(_) | Scalar::DateTime(_) | Scalar::Bytes(_) => {
                conversion_error!(self.tag(), TypeTag::Boolean)
            }
        }
    }

    integral_conversion!(as_i8, i8, TypeTag::SByte);
    integral_conversion!(as_u8, u8, TypeTag::Byte);
    integral_conversion!(as_i16, i16, TypeTag::Int16);
    integral_conversion!(as_u16, u16, TypeTag::UInt16);
    integral_conversion!(as_i32, i32, TypeTag::Int32);
    integral_conversion!(as_u32, u32, TypeTag::UInt32);
    integral_conversion!(as_i64, i64, TypeTag::Int64);
    integral_conversion!(as_u64, u64, TypeTag::UInt64);

    /// Convert the payload to a single precision float
    pub fn as_f32(&self) -> ParserResult<f32> {
        match self {
            Scalar::Null => Ok(0.0),
            Scalar::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Scalar::SByte(v) => Ok(*v as f32),
            Scalar::Byte(v) => Ok(*v as f32),
            Scalar::Int16(v) => Ok(*v as f32),
            Scalar::UInt16(v) => Ok(*v as f32),
            Scalar::Int32(v) => Ok(*v as f32),
            Scalar::UInt32(v) => Ok(*v as f32),
            Scalar::Int64(v) => Ok(*v as f32),
            Scalar::UInt64(v) => Ok(*v as f32),
            Scalar::Single(v) => Ok(*v),
            Scalar::Double(v) => Ok(*v as f32),
            Scalar::Decimal(d) => Ok(d.to_f64() as f32),
            Scalar::String(s) => s
                .trim()
                .parse::<f32>()
                .or(conversion_error!(self.tag(), TypeTag::Single)),
            Scalar::Char(_) | Scalar::DateTime(_) | Scalar::Bytes(_) => {
                conversion_error!(self.tag(), TypeTag::Single)
            }
        }
    }

    /// Convert the payload to a double precision float
    pub fn as_f64(&self) -> ParserResult<f64> {
        match self {
            Scalar::Null => Ok(0.0),
            Scalar::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Scalar::SByte(v) => Ok(*v as f64),
            Scalar::Byte(v) => Ok(*v as f64),
            Scalar::Int16(v) => Ok(*v as f64),
            Scalar::UInt16(v) => Ok(*v as f64),
            Scalar::Int32(v) => Ok(*v as f64),
            Scalar::UInt32(v) => Ok(*v as f64),
            Scalar::Int64(v) => Ok(*v as f64),
            Scalar::UInt64(v) => Ok(*v as f64),
            Scalar::Single(v) => Ok(*v as f64),
            Scalar::Double(v) => Ok(*v),
            Scalar::Decimal(d) => Ok(d.to_f64()),
            Scalar::String(s) => s
                .trim()
                .parse::<f64>()
                .or(conversion_error!(self.tag(), TypeTag::Double)),
            Scalar::Char(_) | Scalar::DateTime(_) | Scalar::Bytes(_) => {
                conversion_error!(self.tag(), TypeTag::Double)
            }
        }
    }

    /// Convert the payload to an exact decimal
    pub fn as_decimal(&self) -> ParserResult<Decimal> {
        match self {
            Scalar::Null => Ok(Decimal::new(0, 0)),
            Scalar::Boolean(b) => Ok(Decimal::new(if *b { 1 } else { 0 }, 0)),
            Scalar::SByte(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::Byte(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::Int16(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::UInt16(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::Int32(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::UInt32(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::Int64(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::UInt64(v) => Ok(Decimal::new(*v as i128, 0)),
            Scalar::Single(v) => Decimal::from_str(&v.to_string())
                .or(conversion_error!(self.tag(), TypeTag::Decimal)),
            Scalar::Double(v) => Decimal::from_str(&v.to_string())
                .or(conversion_error!(self.tag(), TypeTag::Decimal)),
            Scalar::Decimal(d) => Ok(*d),
            Scalar::String(s) => {
                Decimal::from_str(s).or(conversion_error!(self.tag(), TypeTag::Decimal))
            }
            Scalar::Char(_) | Scalar::DateTime(_) | Scalar::Bytes(_) => {
                conversion_error!(self.tag(), TypeTag::Decimal)
            }
        }
    }

    /// Convert the payload to a single character. Integral payloads convert through their
    /// code point, strings must contain exactly one character
    pub fn as_char(&self) -> ParserResult<char> {
        let fail = || ParserError {
            stage: Stage::Conversion,
            details: Details::ConversionFailed {
                from: self.tag(),
                to: TypeTag::Char,
            },
            coords: None,
        };
        match self {
            Scalar::Null => Ok('\0'),
            Scalar::Char(c) => Ok(*c),
            Scalar::SByte(_)
            | Scalar::Byte(_)
            | Scalar::Int16(_)
            | Scalar::UInt16(_)
            | Scalar::Int32(_)
            | Scalar::UInt32(_)
            | Scalar::Int64(_)
            | Scalar::UInt64(_) => {
                let code = self.as_u32().map_err(|_| fail())?;
                char::from_u32(code).ok_or_else(fail)
            }
            Scalar::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(fail()),
                }
            }
            _ => Err(fail()),
        }
    }

    /// Convert the payload to a date/time instant. String payloads are parsed first as
    /// RFC 3339, then as a handful of common unzoned representations interpreted as UTC
    pub fn as_datetime(&self) -> ParserResult<DateTime<Utc>> {
        match self {
            Scalar::Null => Ok(DateTime::<Utc>::MIN_UTC),
            Scalar::DateTime(dt) => Ok(*dt),
            Scalar::String(s) => parse_datetime(s.trim())
                .ok_or(())
                .or(conversion_error!(self.tag(), TypeTag::DateTime)),
            _ => conversion_error!(self.tag(), TypeTag::DateTime),
        }
    }

    /// Convert the payload to its canonical string representation
    pub fn as_string(&self) -> ParserResult<String> {
        match self {
            Scalar::Null => Ok(String::new()),
            Scalar::Boolean(b) => Ok(b.to_string()),
            Scalar::Char(c) => Ok(c.to_string()),
            Scalar::SByte(v) => Ok(v.to_string()),
            Scalar::Byte(v) => Ok(v.to_string()),
            Scalar::Int16(v) => Ok(v.to_string()),
            Scalar::UInt16(v) => Ok(v.to_string()),
            Scalar::Int32(v) => Ok(v.to_string()),
            Scalar::UInt32(v) => Ok(v.to_string()),
            Scalar::Int64(v) => Ok(v.to_string()),
            Scalar::UInt64(v) => Ok(v.to_string()),
            Scalar::Single(v) => Ok(v.to_string()),
            Scalar::Double(v) => Ok(v.to_string()),
            Scalar::Decimal(d) => Ok(d.to_string()),
            Scalar::DateTime(dt) => Ok(dt.to_rfc3339()),
            Scalar::String(s) => Ok(s.clone()),
            Scalar::Bytes(b) => Ok(BASE64_STANDARD.encode(b)),
        }
    }

    /// Convert the payload to a raw byte buffer. String payloads are base64 decoded, byte
    /// buffer payloads are returned as-is, anything else fails
    pub fn as_bytes(&self) -> ParserResult<Vec<u8>> {
        match self {
            Scalar::Bytes(b) => Ok(b.clone()),
            Scalar::String(s) => BASE64_STANDARD.decode(s.trim()).map_err(|err| ParserError {
                stage: Stage::Conversion,
                details: Details::DecodeFailure(err.to_string()),
                coords: None,
            }),
            _ => conversion_error!(self.tag(), TypeTag::Bytes),
        }
    }
}

/// Parse a date/time from its textual representation
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.as_string() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "<opaque>"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int64(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Double(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(value: Vec<u8>) -> Self {
        Scalar::Bytes(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::DateTime(value)
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Decimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;
    use crate::decimal::Decimal;
    use crate::errors::Details;
    use crate::tags::TypeTag;
    use chrono::{TimeZone, Utc};

    #[test]
    fn boolean_literal_table_should_cover_the_common_cases() {
        assert!(!Scalar::from("no").as_bool().unwrap());
        assert!(Scalar::from("yes").as_bool().unwrap());
        assert!(!Scalar::from("0").as_bool().unwrap());
        assert!(Scalar::from("1").as_bool().unwrap());
        assert!(!Scalar::from("").as_bool().unwrap());
        assert!(Scalar::from("TRUE").as_bool().unwrap());
        assert!(!Scalar::from("False").as_bool().unwrap());
    }

    #[test]
    fn unrecognised_strings_should_fail_boolean_conversion() {
        let result = Scalar::from("maybe").as_bool();
        assert!(result.is_err());
        assert_eq!(
            result.err().unwrap().details,
            Details::ConversionFailed {
                from: TypeTag::String,
                to: TypeTag::Boolean
            }
        );
    }

    #[test]
    fn numerics_should_convert_to_booleans_through_the_non_zero_rule() {
        assert!(!Scalar::Int64(0).as_bool().unwrap());
        assert!(Scalar::Int64(1).as_bool().unwrap());
        assert!(Scalar::Int64(2).as_bool().unwrap());
        assert!(Scalar::Double(0.0).as_bool().unwrap() == false);
        assert!(Scalar::Byte(255).as_bool().unwrap());
    }

    #[test]
    fn integral_conversions_should_range_check() {
        assert_eq!(Scalar::Int64(200).as_u8().unwrap(), 200);
        assert!(Scalar::Int64(300).as_u8().is_err());
        assert!(Scalar::Int64(-1).as_u64().is_err());
        assert_eq!(Scalar::UInt64(u64::MAX).as_u64().unwrap(), u64::MAX);
        assert!(Scalar::UInt64(u64::MAX).as_i64().is_err());
    }

    #[test]
    fn floats_should_round_into_integrals() {
        assert_eq!(Scalar::Double(2.5).as_i32().unwrap(), 3);
        assert_eq!(Scalar::Double(-2.5).as_i32().unwrap(), -3);
        assert_eq!(Scalar::Double(2.4).as_i32().unwrap(), 2);
        assert!(Scalar::Double(f64::NAN).as_i32().is_err());
        assert!(Scalar::Double(1e300).as_i64().is_err());
    }

    #[test]
    fn strings_should_parse_into_numerics() {
        assert_eq!(Scalar::from(" 42 ").as_i32().unwrap(), 42);
        assert_eq!(Scalar::from("2.5").as_f64().unwrap(), 2.5);
        assert!(Scalar::from("2.5").as_i32().is_err());
        assert!(Scalar::from("forty two").as_i32().is_err());
    }

    #[test]
    fn nulls_should_convert_to_defaults() {
        assert_eq!(Scalar::Null.as_i64().unwrap(), 0);
        assert_eq!(Scalar::Null.as_f64().unwrap(), 0.0);
        assert!(!Scalar::Null.as_bool().unwrap());
        assert_eq!(Scalar::Null.as_string().unwrap(), "");
        assert_eq!(Scalar::Null.as_char().unwrap(), '\0');
    }

    #[test]
    fn chars_should_convert_through_code_points() {
        assert_eq!(Scalar::Char('A').as_u8().unwrap(), 65);
        assert_eq!(Scalar::Int32(0x1F600).as_char().unwrap(), '😀');
        assert!(Scalar::Char('é').as_bool().is_err());
        assert!(Scalar::Char('x').as_f64().is_err());
    }

    #[test]
    fn decimals_should_convert_both_ways() {
        let d = Scalar::from("123.45").as_decimal().unwrap();
        assert_eq!(d, Decimal::new(12345, 2));
        assert_eq!(Scalar::Decimal(d).as_f64().unwrap(), 123.45);
        assert_eq!(Scalar::Decimal(d).as_i32().unwrap(), 123);
        assert_eq!(Scalar::Int64(7).as_decimal().unwrap(), Decimal::new(7, 0));
    }

    #[test]
    fn datetimes_should_parse_from_common_representations() {
        let expected = Utc.with_ymd_and_hms(2023, 4, 1, 12, 30, 0).unwrap();
        assert_eq!(
            Scalar::from("2023-04-01T12:30:00Z").as_datetime().unwrap(),
            expected
        );
        assert_eq!(
            Scalar::from("2023-04-01 12:30:00").as_datetime().unwrap(),
            expected
        );
        assert!(Scalar::from("not a date").as_datetime().is_err());
        assert!(Scalar::Int64(42).as_datetime().is_err());
    }

    #[test]
    fn byte_buffers_should_decode_from_base64_strings() {
        assert_eq!(
            Scalar::from("aGVsbG8=").as_bytes().unwrap(),
            b"hello".to_vec()
        );
        assert_eq!(
            Scalar::Bytes(vec![1, 2, 3]).as_bytes().unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn invalid_base64_should_surface_a_decode_failure() {
        let result = Scalar::from("@@not base64@@").as_bytes();
        assert!(result.is_err());
        assert!(matches!(
            result.err().unwrap().details,
            Details::DecodeFailure(_)
        ));
    }

    #[test]
    fn non_textual_payloads_should_not_convert_to_buffers() {
        assert!(Scalar::Int64(42).as_bytes().is_err());
        assert!(Scalar::Boolean(true).as_bytes().is_err());
    }

    #[test]
    fn emptiness_should_mean_null_or_empty_string() {
        assert!(Scalar::Null.is_empty());
        assert!(Scalar::from("").is_empty());
        assert!(!Scalar::Int64(0).is_empty());
        assert!(!Scalar::Boolean(false).is_empty());
        assert!(!Scalar::from("x").is_empty());
    }

    #[test]
    fn buffers_should_round_trip_through_strings() {
        let original = Scalar::Bytes(b"chisel".to_vec());
        let encoded = original.as_string().unwrap();
        assert_eq!(Scalar::from(encoded).as_bytes().unwrap(), b"chisel");
    }
}
