use std::fmt::{Debug, Display, Formatter};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

///
/// An exact integer of arbitrary size, as stored in the database records.
///
/// Coefficients of defining polynomials can be larger than 64 bits, and are then
/// stored as decimal strings. Since we only ever need such integers modulo a
/// small prime, we keep the decimal representation and reduce it on demand,
/// instead of implementing arbitrary-precision arithmetic.
///
/// This deserializes both from JSON integers and from strings like `"-576"`.
///
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IntegerCoefficient {
    negative: bool,
    /// decimal digits, most significant first, without leading zeros; empty for zero
    digits: Vec<u8>
}

impl IntegerCoefficient {

    pub fn zero() -> Self {
        IntegerCoefficient { negative: false, digits: Vec::new() }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed)
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let digits: Vec<u8> = unsigned.bytes().map(|c| c - b'0').skip_while(|d| *d == 0).collect();
        return Some(IntegerCoefficient { negative: negative && !digits.is_empty(), digits: digits });
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_neg(&self) -> bool {
        self.negative
    }

    ///
    /// Returns the smallest nonnegative representative of this integer modulo `modulus`.
    ///
    pub fn reduce_mod(&self, modulus: u64) -> u64 {
        assert!(modulus > 0);
        let modulus = modulus as u128;
        let mut result: u128 = 0;
        for d in &self.digits {
            result = (result * 10 + *d as u128) % modulus;
        }
        if self.negative && result != 0 {
            result = modulus - result;
        }
        return result as u64;
    }

    ///
    /// Returns the value as `i64`, or `None` if it does not fit.
    ///
    pub fn to_i64(&self) -> Option<i64> {
        let mut result: i128 = 0;
        for d in &self.digits {
            result = result.checked_mul(10)?.checked_add(*d as i128)?;
            if result > i64::MAX as i128 + 1 {
                return None;
            }
        }
        if self.negative {
            result = -result;
        }
        return i64::try_from(result).ok();
    }

    pub fn to_f64_approx(&self) -> f64 {
        let abs = self.digits.iter().fold(0., |acc, d| acc * 10. + *d as f64);
        if self.negative { -abs } else { abs }
    }
}

impl From<i64> for IntegerCoefficient {

    fn from(value: i64) -> Self {
        let negative = value < 0;
        let digits = if value == 0 {
            Vec::new()
        } else {
            value.unsigned_abs().to_string().bytes().map(|c| c - b'0').collect()
        };
        IntegerCoefficient { negative: negative, digits: digits }
    }
}

impl Display for IntegerCoefficient {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.digits.is_empty() {
            return write!(f, "0");
        }
        if self.negative {
            write!(f, "-")?;
        }
        for d in &self.digits {
            write!(f, "{}", d)?;
        }
        return Ok(());
    }
}

impl Debug for IntegerCoefficient {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

struct IntegerCoefficientVisitor;

impl<'de> Visitor<'de> for IntegerCoefficientVisitor {

    type Value = IntegerCoefficient;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "an integer, or a string containing a decimal integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(IntegerCoefficient::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(IntegerCoefficient::parse(&v.to_string()).unwrap_or_else(IntegerCoefficient::zero))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        IntegerCoefficient::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for IntegerCoefficient {

    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_any(IntegerCoefficientVisitor)
    }
}

///
/// Converts a list of `i64` into coefficients, mainly useful for constructing
/// polynomials in code.
///
pub fn int_coefficients<I>(values: I) -> Vec<IntegerCoefficient>
    where I: IntoIterator<Item = i64>
{
    values.into_iter().map(IntegerCoefficient::from).collect()
}

#[test]
fn test_parse() {
    assert_eq!(Some(IntegerCoefficient::from(-576)), IntegerCoefficient::parse("-576"));
    assert_eq!(Some(IntegerCoefficient::from(12)), IntegerCoefficient::parse("+0012"));
    assert_eq!(Some(IntegerCoefficient::zero()), IntegerCoefficient::parse("-0"));
    assert_eq!(None, IntegerCoefficient::parse("1.5"));
    assert_eq!(None, IntegerCoefficient::parse("-"));
    assert_eq!("-576", format!("{}", IntegerCoefficient::from(-576)));
    assert_eq!("0", format!("{}", IntegerCoefficient::zero()));
}

#[test]
fn test_reduce_mod() {
    assert_eq!(3, IntegerCoefficient::from(10).reduce_mod(7));
    assert_eq!(4, IntegerCoefficient::from(-10).reduce_mod(7));
    assert_eq!(0, IntegerCoefficient::from(-14).reduce_mod(7));
    // 10^30 = (10^6)^5 and 10^6 = 1 mod 7
    let large = IntegerCoefficient::parse("1000000000000000000000000000000").unwrap();
    assert_eq!(1, large.reduce_mod(7));
    assert_eq!(None, large.to_i64());
}

#[test]
fn test_to_i64() {
    assert_eq!(Some(i64::MIN), IntegerCoefficient::from(i64::MIN).to_i64());
    assert_eq!(Some(i64::MAX), IntegerCoefficient::from(i64::MAX).to_i64());
    assert_eq!(None, IntegerCoefficient::parse("9223372036854775808").unwrap().to_i64());
    assert_eq!(-576., IntegerCoefficient::from(-576).to_f64_approx());
}
