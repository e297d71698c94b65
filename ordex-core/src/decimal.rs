//! Fixed-point decimal arithmetic for token amounts.
//!
//! Every amount in the protocol is a signed arbitrary-magnitude integer
//! scaled by an explicit per-value precision in `0..=18`. Binary operations
//! that require aligned scales (`add`, `sub`, `cmp`) panic on a precision
//! mismatch: mixing scales is a programmer error, not a data error, and
//! silently rescaling would corrupt consensus state.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecimalError;

/// Maximum supported precision (decimal places).
pub const MAX_PRECISION: u32 = 18;

fn pow10(p: u32) -> BigInt {
    BigInt::from(10u32).pow(p)
}

/// A fixed-point decimal: `value / 10^precision`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    precision: u32,
    value: BigInt,
}

impl Decimal {
    /// Create a decimal from an unsigned integer of scaled units.
    ///
    /// `precision` is clamped to [`MAX_PRECISION`].
    pub fn new(units: u64, precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
            value: BigInt::from(units),
        }
    }

    /// The zero value at the given precision.
    pub fn zero(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
            value: BigInt::zero(),
        }
    }

    /// Parse a decimal literal `I[.F]` scaled to `max_precision`.
    ///
    /// Rejected forms, per the canonical-string rule:
    /// - empty string, empty integer part, more than one `.`
    /// - a leading `+`, or any sign on the fractional part
    /// - scientific notation or any non-digit character
    /// - redundant leading zeros (`007`, `01.5`)
    /// - a fractional part longer than `max_precision`
    pub fn parse(s: &str, max_precision: u32) -> Result<Self, DecimalError> {
        if s.is_empty() {
            return Err(DecimalError::Empty);
        }
        let max_precision = max_precision.min(MAX_PRECISION);

        let mut parts = s.splitn(3, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next();
        if parts.next().is_some() {
            return Err(DecimalError::Malformed(s.to_string()));
        }

        let (negative, digits) = match int_part.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, int_part),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecimalError::Malformed(s.to_string()));
        }
        // canonical: a single zero, or no leading zero at all
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(DecimalError::Malformed(s.to_string()));
        }

        let mut value = digits.parse::<BigInt>().expect("digits verified")
            * pow10(max_precision);

        if let Some(frac) = frac_part {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DecimalError::Malformed(s.to_string()));
            }
            if frac.len() as u32 > max_precision {
                return Err(DecimalError::PrecisionExceeded {
                    digits: frac.len(),
                    max: max_precision,
                });
            }
            value += frac.parse::<BigInt>().expect("digits verified")
                * pow10(max_precision - frac.len() as u32);
        }

        if negative {
            value = -value;
        }
        Ok(Self {
            precision: max_precision,
            value,
        })
    }

    /// The precision (number of decimal places) of this value.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Sign of the value: -1, 0, or 1.
    pub fn sign(&self) -> i32 {
        match self.value.sign() {
            num_bigint::Sign::Minus => -1,
            num_bigint::Sign::NoSign => 0,
            num_bigint::Sign::Plus => 1,
        }
    }

    /// Whether the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn assert_aligned(&self, other: &Self, op: &str) {
        assert_eq!(
            self.precision, other.precision,
            "decimal {} with mismatched precision ({} != {})",
            op, self.precision, other.precision
        );
    }

    /// Add two decimals of equal precision.
    ///
    /// # Panics
    /// Panics if the precisions differ.
    pub fn add(&self, other: &Self) -> Self {
        self.assert_aligned(other, "add");
        Self {
            precision: self.precision,
            value: &self.value + &other.value,
        }
    }

    /// Subtract two decimals of equal precision.
    ///
    /// # Panics
    /// Panics if the precisions differ.
    pub fn sub(&self, other: &Self) -> Self {
        self.assert_aligned(other, "sub");
        Self {
            precision: self.precision,
            value: &self.value - &other.value,
        }
    }

    /// Compare two decimals of equal precision.
    ///
    /// # Panics
    /// Panics if the precisions differ.
    pub fn cmp(&self, other: &Self) -> Ordering {
        self.assert_aligned(other, "cmp");
        self.value.cmp(&other.value)
    }

    /// Multiply magnitudes, keeping the left operand's precision.
    ///
    /// This is an integer-scale multiply: no implicit rescale is applied,
    /// so the caller is responsible for dividing the extra scale back out.
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            precision: self.precision,
            value: &self.value * &other.value,
        }
    }

    /// Integer-divide magnitudes at the left operand's precision.
    pub fn div(&self, other: &Self) -> Self {
        Self {
            precision: self.precision,
            value: &self.value / &other.value,
        }
    }

    /// Integer square root of the magnitude, at precision 18.
    pub fn sqrt(&self) -> Self {
        Self {
            precision: MAX_PRECISION,
            value: self.value.sqrt(),
        }
    }

    /// Truncate to a lower precision by integer division by `10^(old-new)`.
    ///
    /// # Panics
    /// Panics if `precision` is greater than the current precision.
    pub fn with_precision(&self, precision: u32) -> Self {
        if precision == self.precision {
            return self.clone();
        }
        assert!(
            precision < self.precision,
            "precision may only decrease ({} -> {})",
            self.precision,
            precision
        );
        Self {
            precision,
            value: &self.value / pow10(self.precision - precision),
        }
    }

    /// Whether the value exceeds `u64::MAX * 10^precision`.
    pub fn is_overflow_u64(&self) -> bool {
        self.value > BigInt::from(u64::MAX) * pow10(self.precision)
    }

    /// The maximum representable u64-backed amount at the given precision.
    pub fn max_u64(precision: u32) -> Self {
        let precision = precision.min(MAX_PRECISION);
        Self {
            precision,
            value: BigInt::from(u64::MAX) * pow10(precision),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value.is_negative() { "-" } else { "" };
        let abs = self.value.abs();
        let factor = pow10(self.precision);
        let quotient = &abs / &factor;
        let remainder = &abs % &factor;
        if remainder.is_zero() {
            return write!(f, "{}{}", sign, quotient);
        }
        let frac = format!("{:0>width$}", remainder, width = self.precision as usize);
        write!(f, "{}{}.{}", sign, quotient, frac.trim_end_matches('0'))
    }
}

// Serialized as (precision, magnitude-digits) so the scale survives
// round-trips even when the printed form has no fractional digits.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.precision, self.value.to_string()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (precision, digits) = <(u32, String)>::deserialize(deserializer)?;
        if precision > MAX_PRECISION {
            return Err(D::Error::custom("decimal precision out of range"));
        }
        let value = digits
            .parse::<BigInt>()
            .map_err(|_| D::Error::custom("invalid decimal magnitude"))?;
        Ok(Self { precision, value })
    }
}
