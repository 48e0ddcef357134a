//! # The Numeric Value
//!
//! [`NumValue`] is the engine's uniform numeric type: a tagged union over a
//! native `f64` and the arbitrary-magnitude [`BigNum`]. Formulas never care
//! which side they are on.
//!
//! ## Canonical form
//!
//! - `Plain` holds only finite values with `|v| <` [`SAFE_FLOAT_LIMIT`]
//! - `Big` holds only magnitudes at or above that limit
//! - every constructor and operation re-establishes this, so derived
//!   equality between independently computed values is exact
//!
//! ## Failure policy
//!
//! Arithmetic never panics and never yields NaN or an infinity. Undefined
//! outcomes (division by zero, negative base to a fractional power)
//! collapse to the zero sentinel.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::big::BigNum;
use crate::error::{ConversionError, NumericResult};

/// Largest magnitude a native float is trusted to carry without integer
/// drift. At or above this, values live in the extended representation and
/// [`NumValue::to_safe_f64`] refuses to narrow.
pub const SAFE_FLOAT_LIMIT: f64 = 1e15;

/// A quantity that may exceed native floating-point range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumValue {
    /// Native float, finite, magnitude below [`SAFE_FLOAT_LIMIT`].
    Plain(f64),
    /// Extended mantissa/exponent representation for everything else.
    Big(BigNum),
}

impl NumValue {
    /// Zero.
    pub const ZERO: Self = Self::Plain(0.0);

    /// One.
    pub const ONE: Self = Self::Plain(1.0);

    /// Strict constructor from a native float.
    ///
    /// # Errors
    ///
    /// [`ConversionError::NonFinite`] for NaN or infinities.
    pub fn from_f64(value: f64) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(ConversionError::NonFinite);
        }
        Ok(Self::canonical_f64(value))
    }

    /// Lenient constructor: non-finite input degrades to zero.
    #[must_use]
    pub fn coerce_f64(value: f64) -> Self {
        Self::from_f64(value).unwrap_or(Self::ZERO)
    }

    /// Lenient constructor from a string: malformed input degrades to zero.
    #[must_use]
    pub fn coerce_str(input: &str) -> Self {
        input.parse().unwrap_or(Self::ZERO)
    }

    fn canonical_f64(value: f64) -> Self {
        if value.abs() < SAFE_FLOAT_LIMIT {
            Self::Plain(value)
        } else {
            Self::Big(BigNum::from_f64(value))
        }
    }

    fn canonical_big(value: BigNum) -> Self {
        // Exponent 15 is the first magnitude at or above 1e15. Demotion
        // narrows through the native float, so magnitudes below the f64
        // subnormal floor (~1e-320) underflow to the zero value: the
        // extended representation is for large magnitudes only, never for
        // extra precision near zero.
        if value.exponent() < 15 {
            Self::Plain(value.to_f64())
        } else {
            Self::Big(value)
        }
    }

    /// Promotes to the extended representation.
    #[must_use]
    pub fn promote(self) -> BigNum {
        match self {
            Self::Plain(v) => BigNum::from_f64(v),
            Self::Big(b) => b,
        }
    }

    /// Lossy float view: saturates instead of overflowing. Internal use
    /// only; public callers narrow through [`Self::to_safe_f64`].
    pub(crate) fn approx_f64(self) -> f64 {
        match self {
            Self::Plain(v) => v,
            Self::Big(b) => b.to_f64(),
        }
    }

    /// Safe narrowing: the native float only when finite and below
    /// [`SAFE_FLOAT_LIMIT`] in magnitude, otherwise `0.0`. Callers that need
    /// the unclamped magnitude format via `to_string()` instead.
    #[must_use]
    pub fn to_safe_f64(self) -> f64 {
        match self {
            Self::Plain(v) => v,
            Self::Big(_) => 0.0,
        }
    }

    /// True for the zero value.
    #[must_use]
    pub fn is_zero(self) -> bool {
        matches!(self, Self::Plain(v) if v == 0.0)
    }

    /// True for strictly negative values.
    #[must_use]
    pub fn is_negative(self) -> bool {
        match self {
            Self::Plain(v) => v < 0.0,
            Self::Big(b) => b.is_negative(),
        }
    }

    /// Addition.
    #[must_use]
    pub fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Plain(a), Self::Plain(b)) => {
                let sum = a + b;
                if sum.abs() < SAFE_FLOAT_LIMIT {
                    Self::Plain(sum)
                } else {
                    Self::canonical_big(BigNum::from_f64(sum))
                }
            }
            _ => Self::canonical_big(self.promote().add(rhs.promote())),
        }
    }

    /// Subtraction.
    #[must_use]
    pub fn sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Plain(a), Self::Plain(b)) => Self::canonical_f64(a - b),
            _ => Self::canonical_big(self.promote().sub(rhs.promote())),
        }
    }

    /// Multiplication.
    #[must_use]
    pub fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Plain(a), Self::Plain(b)) => {
                let product = a * b;
                if product.abs() < SAFE_FLOAT_LIMIT {
                    Self::Plain(product)
                } else {
                    Self::canonical_big(BigNum::from_f64(product))
                }
            }
            _ => Self::canonical_big(self.promote().mul(rhs.promote())),
        }
    }

    /// Division. Division by zero returns the zero sentinel.
    #[must_use]
    pub fn div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return Self::ZERO;
        }
        match (self, rhs) {
            (Self::Plain(a), Self::Plain(b)) => {
                let quotient = a / b;
                // A tiny divisor can push a plain quotient past f64 range
                if quotient.is_finite() {
                    Self::canonical_f64(quotient)
                } else {
                    Self::canonical_big(self.promote().div(rhs.promote()))
                }
            }
            _ => Self::canonical_big(self.promote().div(rhs.promote())),
        }
    }

    /// Raises to a real power. Sentinel edges follow [`BigNum::pow`].
    #[must_use]
    pub fn pow(self, exp: Self) -> Self {
        let exp_f = exp.approx_f64();
        if let Self::Plain(base) = self {
            let raw = base.powf(exp_f);
            if raw.is_finite() && raw.abs() < SAFE_FLOAT_LIMIT {
                return Self::Plain(raw);
            }
        }
        Self::canonical_big(self.promote().pow(exp_f))
    }

    /// Raises to a non-negative integer power by binary exponentiation.
    #[must_use]
    pub fn powi(self, mut n: u64) -> Self {
        let mut acc = Self::ONE;
        let mut base = self;
        while n > 0 {
            if n & 1 == 1 {
                acc = acc.mul(base);
            }
            base = base.mul(base);
            n >>= 1;
        }
        acc
    }

    /// Greater-or-equal comparison.
    #[must_use]
    pub fn gte(self, rhs: Self) -> bool {
        self.compare(rhs) != Ordering::Less
    }

    /// Strictly-greater comparison.
    #[must_use]
    pub fn gt(self, rhs: Self) -> bool {
        self.compare(rhs) == Ordering::Greater
    }

    /// Less-or-equal comparison.
    #[must_use]
    pub fn lte(self, rhs: Self) -> bool {
        self.compare(rhs) != Ordering::Greater
    }

    /// Strictly-less comparison.
    #[must_use]
    pub fn lt(self, rhs: Self) -> bool {
        self.compare(rhs) == Ordering::Less
    }

    /// Larger of the two values.
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        if self.gte(rhs) { self } else { rhs }
    }

    /// Smaller of the two values.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        if self.lte(rhs) { self } else { rhs }
    }

    fn compare(self, rhs: Self) -> Ordering {
        match (self, rhs) {
            // Plain values are finite by invariant, so this never fails
            (Self::Plain(a), Self::Plain(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => self
                .promote()
                .partial_cmp(&rhs.promote())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl PartialOrd for NumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(*other))
    }
}

impl Default for NumValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for NumValue {
    fn from(value: f64) -> Self {
        Self::coerce_f64(value)
    }
}

impl From<i64> for NumValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::coerce_f64(value as f64)
    }
}

impl From<u64> for NumValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self::coerce_f64(value as f64)
    }
}

impl From<i32> for NumValue {
    fn from(value: i32) -> Self {
        Self::coerce_f64(f64::from(value))
    }
}

impl From<u32> for NumValue {
    fn from(value: u32) -> Self {
        Self::coerce_f64(f64::from(value))
    }
}

impl FromStr for NumValue {
    type Err = ConversionError;

    /// Parses through [`BigNum`] and canonicalizes. Large magnitudes beyond
    /// `f64` range are preserved; magnitudes below the `f64` subnormal
    /// floor (e.g. `"1e-400"`) underflow to zero.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input.parse::<BigNum>().map(Self::canonical_big)
    }
}

impl Serialize for NumValue {
    /// Plain values serialize as JSON numbers; extended values as their
    /// round-trippable scientific string (a float would overflow).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(v) => serializer.serialize_f64(*v),
            Self::Big(b) => serializer.serialize_str(&b.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for NumValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumValueVisitor;

        impl Visitor<'_> for NumValueVisitor {
            type Value = NumValue;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a number or a numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<NumValue, E> {
                NumValue::from_f64(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NumValue, E> {
                Ok(NumValue::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NumValue, E> {
                Ok(NumValue::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NumValue, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(NumValueVisitor)
    }
}
