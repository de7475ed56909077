//! Exact arbitrary precision decimals
//!
//! Interval arithmetic promotes its absolute form into this type whenever a
//! fractional operand or result is involved. All operations are exact; the
//! only rounding happens in [`Decimal::divide`] at the scale the caller asks for.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ValueError, ValueResult};

/// Arbitrary precision decimal value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// Wrap a big decimal
    pub fn new(inner: BigDecimal) -> Self {
        Self(inner)
    }

    /// Create a decimal from an unscaled integer and a scale
    pub fn from_unscaled(unscaled: BigInt, scale: i64) -> Self {
        Self(BigDecimal::new(unscaled, scale))
    }

    /// Create an integral decimal
    pub fn from_bigint(value: BigInt) -> Self {
        Self(BigDecimal::new(value, 0))
    }

    /// Access the wrapped big decimal
    pub fn inner(&self) -> &BigDecimal {
        &self.0
    }

    /// Number of digits after the decimal point (negative for multiples of powers of ten)
    pub fn scale(&self) -> i64 {
        self.0.as_bigint_and_exponent().1
    }

    /// Number of digits of the unscaled value
    pub fn precision(&self) -> u64 {
        self.0.digits()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact product
    pub fn multiply(&self, other: &Decimal) -> Decimal {
        Self(&self.0 * &other.0)
    }

    /// Quotient at the given scale, rounding half down.
    ///
    /// Fails with a division by zero error when `other` is exactly zero.
    pub fn divide(&self, other: &Decimal, scale: i64) -> ValueResult<Decimal> {
        let Quotient {
            mut quotient,
            remainder,
            divisor,
        } = self.scaled_quotient(other, scale)?;
        if (remainder.abs() * 2u8) > divisor.abs() {
            if remainder.is_negative() != divisor.is_negative() {
                quotient -= 1;
            } else {
                quotient += 1;
            }
        }
        Ok(Self::from_unscaled(quotient, scale))
    }

    /// Integer part of the quotient, truncated toward zero
    pub fn divide_integral(&self, other: &Decimal) -> ValueResult<BigInt> {
        Ok(self.scaled_quotient(other, 0)?.quotient)
    }

    /// Integer part of this value, truncated toward zero
    pub fn to_bigint_truncated(&self) -> BigInt {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        if scale <= 0 {
            unscaled * pow10(scale.unsigned_abs())
        } else {
            unscaled / pow10(scale.unsigned_abs())
        }
    }

    // (self / other) * 10^scale as an integer division of unscaled values
    fn scaled_quotient(&self, other: &Decimal, scale: i64) -> ValueResult<Quotient> {
        let (dividend, dividend_scale) = self.0.as_bigint_and_exponent();
        let (divisor, divisor_scale) = other.0.as_bigint_and_exponent();
        if divisor.is_zero() {
            return Err(ValueError::division_by_zero(self));
        }
        let shift = scale - dividend_scale + divisor_scale;
        let (numerator, divisor) = if shift >= 0 {
            (dividend * pow10(shift.unsigned_abs()), divisor)
        } else {
            (dividend, divisor * pow10(shift.unsigned_abs()))
        };
        Ok(Quotient {
            quotient: &numerator / &divisor,
            remainder: &numerator % &divisor,
            divisor,
        })
    }
}

struct Quotient {
    quotient: BigInt,
    remainder: BigInt,
    divisor: BigInt,
}

fn pow10(exponent: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exponent as usize)
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::from_bigint(value)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_bigint(BigInt::from(value))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::new(BigDecimal::from_str(s).unwrap())
    }

    #[test]
    fn test_divide_at_scale() {
        let q = Decimal::from(10).divide(&Decimal::from(3), 5).unwrap();
        assert_eq!(q.to_string(), "3.33333");
        assert_eq!(q.scale(), 5);

        let q = Decimal::from(2).divide(&Decimal::from(3), 3).unwrap();
        assert_eq!(q.to_string(), "0.667");
    }

    #[test]
    fn test_divide_rounds_half_down() {
        // 0.125 at scale 2: exactly half, rounds toward zero
        let q = Decimal::from(1).divide(&Decimal::from(8), 2).unwrap();
        assert_eq!(q.to_string(), "0.12");
        let q = Decimal::from(-1).divide(&Decimal::from(8), 2).unwrap();
        assert_eq!(q.to_string(), "-0.12");
        let q = Decimal::from(-2).divide(&Decimal::from(3), 2).unwrap();
        assert_eq!(q.to_string(), "-0.67");
    }

    #[test]
    fn test_divide_by_zero() {
        let err = Decimal::from(1).divide(&dec("0.000"), 4).unwrap_err();
        assert!(matches!(err, ValueError::DivisionByZero { .. }));
        assert!(Decimal::from(1).divide_integral(&Decimal::from(0)).is_err());
    }

    #[test]
    fn test_divide_integral_truncates() {
        assert_eq!(Decimal::from(7).divide_integral(&dec("2.5")).unwrap(), BigInt::from(2));
        assert_eq!(Decimal::from(-7).divide_integral(&Decimal::from(2)).unwrap(), BigInt::from(-3));
        assert_eq!(Decimal::from(10).divide_integral(&dec("0.3")).unwrap(), BigInt::from(33));
    }

    #[test]
    fn test_multiply_and_truncate() {
        let p = Decimal::from(10).multiply(&dec("1.55"));
        assert_eq!(p.to_bigint_truncated(), BigInt::from(15));
        let p = Decimal::from(-10).multiply(&dec("1.55"));
        assert_eq!(p.to_bigint_truncated(), BigInt::from(-15));
        assert_eq!(dec("12E+3").to_bigint_truncated(), BigInt::from(12_000));
    }
}
