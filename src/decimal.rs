//! A minimal exact decimal representation used for decimal scalar payloads
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::{Details, ParserError, ParserResult, Stage};

/// An exact base-10 number held as an integer mantissa and a scale. The value represented is
/// `mantissa / 10^scale`. No normalisation is performed on construction, so `1.50` and `1.5`
/// carry different scales but compare equal through [Decimal::eq]
#[derive(Debug, Copy, Clone)]
pub struct Decimal {
    /// The unscaled mantissa
    pub mantissa: i128,
    /// Number of fractional base-10 digits
    pub scale: u32,
}

impl Decimal {
    /// Construct a new decimal from a raw mantissa and scale
    pub fn new(mantissa: i128, scale: u32) -> Self {
        Decimal { mantissa, scale }
    }

    /// Lossy conversion into a double precision float
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Convert into a 128-bit integer, rounding half away from zero
    pub fn round_i128(&self) -> i128 {
        if self.scale == 0 {
            return self.mantissa;
        }
        let divisor = 10i128.pow(self.scale);
        let quotient = self.mantissa / divisor;
        let remainder = (self.mantissa % divisor).abs();
        if remainder * 2 >= divisor {
            quotient + self.mantissa.signum()
        } else {
            quotient
        }
    }

    fn parse_failure(repr: &str) -> ParserError {
        ParserError {
            stage: Stage::Conversion,
            details: Details::InvalidNumericRepresentation(repr.to_string()),
            coords: None,
        }
    }
}

impl FromStr for Decimal {
    type Err = ParserError;

    /// Parse from a plain or scientific base-10 representation
    fn from_str(s: &str) -> ParserResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Decimal::parse_failure(s));
        }
        let (mantissa_part, exponent) = match s.find(['e', 'E']) {
            Some(pos) => {
                let exp = s[pos + 1..]
                    .parse::<i32>()
                    .map_err(|_| Decimal::parse_failure(s))?;
                (&s[..pos], exp)
            }
            None => (s, 0),
        };
        let (digits, point_scale) = match mantissa_part.find('.') {
            Some(pos) => {
                let fractional = &mantissa_part[pos + 1..];
                if fractional.is_empty() {
                    return Err(Decimal::parse_failure(s));
                }
                (
                    format!("{}{}", &mantissa_part[..pos], fractional),
                    fractional.len() as i32,
                )
            }
            None => (mantissa_part.to_string(), 0),
        };
        let mantissa = digits
            .parse::<i128>()
            .map_err(|_| Decimal::parse_failure(s))?;
        let scale = point_scale - exponent;
        if scale >= 0 {
            Ok(Decimal::new(mantissa, scale as u32))
        } else {
            // fold a positive exponent back into the mantissa
            let factor = 10i128
                .checked_pow((-scale) as u32)
                .ok_or_else(|| Decimal::parse_failure(s))?;
            let mantissa = mantissa
                .checked_mul(factor)
                .ok_or_else(|| Decimal::parse_failure(s))?;
            Ok(Decimal::new(mantissa, 0))
        }
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (integral, fractional) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, integral, fractional)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl PartialEq for Decimal {
    /// Scale-insensitive equality
    fn eq(&self, other: &Self) -> bool {
        if self.scale == other.scale {
            return self.mantissa == other.mantissa;
        }
        // compare on a common scale, bailing out to float comparison on overflow
        let (low, high) = if self.scale < other.scale {
            (self, other)
        } else {
            (other, self)
        };
        match 10i128
            .checked_pow(high.scale - low.scale)
            .and_then(|f| low.mantissa.checked_mul(f))
        {
            Some(rescaled) => rescaled == high.mantissa,
            None => self.to_f64() == other.to_f64(),
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(value as i128, 0)
    }
}
