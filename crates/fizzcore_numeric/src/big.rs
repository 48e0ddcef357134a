//! # Arbitrary-Magnitude Numbers
//!
//! **The extended representation behind [`crate::NumValue`].**
//!
//! A [`BigNum`] stores `mantissa * 10^exponent` with an `f64` mantissa and an
//! `i64` exponent, so magnitudes far beyond `f64::MAX` (think `1e10000`)
//! stay representable with ~15 significant digits.
//!
//! ## Invariants
//!
//! 1. **Normalized**: `1 <= |mantissa| < 10`, except zero which is exactly
//!    `{0.0, 0}`
//! 2. **Finite**: the mantissa is never NaN or infinite; exponent overflow
//!    saturates at [`BigNum::MAX`] instead of producing `Infinity`
//! 3. **Immutable**: every operation returns a new value

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;

/// Exponent saturation ceiling. Values past `10^(1e12)` clamp to
/// [`BigNum::MAX`]; values below `10^(-1e12)` underflow to zero.
pub const MAX_EXPONENT: i64 = 1_000_000_000_000;

/// Largest exponent gap at which addition still moves the smaller operand.
/// Past ~17 decimal digits the smaller operand is below one ulp of the
/// larger mantissa.
const ALIGN_LIMIT: i64 = 17;

/// Arbitrary-magnitude decimal float: `mantissa * 10^exponent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BigNum {
    mantissa: f64,
    exponent: i64,
}

impl BigNum {
    /// Zero.
    pub const ZERO: Self = Self { mantissa: 0.0, exponent: 0 };

    /// One.
    pub const ONE: Self = Self { mantissa: 1.0, exponent: 0 };

    /// Saturation value for exponent overflow. Finite by construction.
    pub const MAX: Self = Self { mantissa: 9.999_999_999_999_998, exponent: MAX_EXPONENT };

    /// Builds a normalized value from raw mantissa/exponent parts.
    ///
    /// A NaN mantissa collapses to zero; an infinite mantissa saturates to
    /// `±MAX`. Exponents outside `±`[`MAX_EXPONENT`] saturate (overflow) or
    /// underflow to zero.
    #[must_use]
    pub fn from_parts(mantissa: f64, exponent: i64) -> Self {
        if mantissa == 0.0 {
            return Self::ZERO;
        }
        if mantissa.is_nan() {
            return Self::ZERO;
        }
        if mantissa.is_infinite() {
            return Self::MAX.copysign(mantissa);
        }
        // log10 of the absolute mantissa tells how far we are from [1, 10)
        #[allow(clippy::cast_possible_truncation)]
        let shift = mantissa.abs().log10().floor() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let mut m = mantissa / 10f64.powi(shift as i32);
        let mut e = exponent.saturating_add(shift);
        // Rounding at the powi boundary can leave m just outside [1, 10)
        if m.abs() >= 10.0 {
            m /= 10.0;
            e = e.saturating_add(1);
        } else if m.abs() < 1.0 {
            m *= 10.0;
            e = e.saturating_sub(1);
        }
        if e > MAX_EXPONENT {
            return Self::MAX.copysign(m);
        }
        if e < -MAX_EXPONENT {
            return Self::ZERO;
        }
        Self { mantissa: m, exponent: e }
    }

    /// Builds from a native float. Non-finite input collapses to zero.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self::from_parts(value, 0)
    }

    /// The normalized mantissa (`1 <= |m| < 10`, or `0.0`).
    #[inline]
    #[must_use]
    pub const fn mantissa(self) -> f64 {
        self.mantissa
    }

    /// The base-10 exponent.
    #[inline]
    #[must_use]
    pub const fn exponent(self) -> i64 {
        self.exponent
    }

    /// True if this is the zero value.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.mantissa == 0.0
    }

    /// True if the value is strictly negative.
    #[inline]
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.mantissa < 0.0
    }

    fn copysign(self, from: f64) -> Self {
        Self { mantissa: self.mantissa.copysign(from), exponent: self.exponent }
    }

    /// Absolute value.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        Self { mantissa: self.mantissa.abs(), exponent: self.exponent }
    }

    /// Negation.
    #[inline]
    #[must_use]
    pub fn neg(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        Self { mantissa: -self.mantissa, exponent: self.exponent }
    }

    /// Lossy narrowing to `f64`. Saturates at `±f64::MAX` instead of
    /// returning an infinity; underflows to `0.0`.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        if self.exponent > 308 {
            return f64::MAX.copysign(self.mantissa);
        }
        if self.exponent < -320 {
            return 0.0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let value = self.mantissa * 10f64.powi(self.exponent as i32);
        if value.is_finite() {
            value
        } else {
            f64::MAX.copysign(self.mantissa)
        }
    }

    /// Addition. Operands more than ~17 decimal orders apart leave the
    /// larger one unchanged (the smaller is below one ulp).
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        let (hi, lo) = if self.exponent >= other.exponent { (self, other) } else { (other, self) };
        let diff = hi.exponent - lo.exponent;
        if diff > ALIGN_LIMIT {
            return hi;
        }
        #[allow(clippy::cast_possible_truncation)]
        let m = hi.mantissa + lo.mantissa / 10f64.powi(diff as i32);
        Self::from_parts(m, hi.exponent)
    }

    /// Subtraction.
    #[inline]
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    /// Multiplication.
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        // |m1 * m2| < 100, always finite
        Self::from_parts(self.mantissa * other.mantissa, self.exponent.saturating_add(other.exponent))
    }

    /// Division. Division by zero returns the zero sentinel, the engine-wide
    /// convention for undefined numeric outcomes.
    #[must_use]
    pub fn div(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        Self::from_parts(self.mantissa / other.mantissa, self.exponent.saturating_sub(other.exponent))
    }

    /// Base-10 logarithm. `None` for zero or negative values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn log10(self) -> Option<f64> {
        if self.mantissa <= 0.0 {
            return None;
        }
        Some(self.exponent as f64 + self.mantissa.log10())
    }

    /// `10^r` for a real `r`. Saturates instead of overflowing.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn exp10(r: f64) -> Self {
        if r.is_nan() {
            return Self::ZERO;
        }
        if r.is_infinite() {
            return if r > 0.0 { Self::MAX } else { Self::ZERO };
        }
        let e = r.floor();
        if e > MAX_EXPONENT as f64 {
            return Self::MAX;
        }
        if e < -(MAX_EXPONENT as f64) {
            return Self::ZERO;
        }
        let m = 10f64.powf(r - e);
        Self::from_parts(m, e as i64)
    }

    /// Raises to a real power.
    ///
    /// Edge policy (all sentinel, never a panic or a NaN):
    /// - `0^0 = 1`, `0^positive = 0`, `0^negative = 0`
    /// - negative base with a non-integer exponent yields zero
    /// - a non-finite exponent yields zero
    #[must_use]
    pub fn pow(self, exp: f64) -> Self {
        if !exp.is_finite() {
            return Self::ZERO;
        }
        if exp == 0.0 {
            return Self::ONE;
        }
        if self.is_zero() {
            return Self::ZERO;
        }
        if self.is_negative() {
            if exp.fract() != 0.0 {
                return Self::ZERO;
            }
            let out = self.abs().pow(exp);
            let odd = (exp.abs() % 2.0) != 0.0;
            return if odd { out.neg() } else { out };
        }
        // log-space: self^exp = 10^(exp * log10(self))
        match self.log10() {
            Some(log) => Self::exp10(log * exp),
            None => Self::ZERO,
        }
    }

    /// Raises to a non-negative integer power by binary exponentiation,
    /// `O(log n)` multiplications.
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

    fn sign_class(self) -> i8 {
        if self.is_zero() {
            0
        } else if self.mantissa < 0.0 {
            -1
        } else {
            1
        }
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        let (sa, sb) = (self.sign_class(), other.sign_class());
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == 0 {
            return Ordering::Equal;
        }
        let magnitude = match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => self.mantissa.abs().total_cmp(&other.mantissa.abs()),
            ord => ord,
        };
        if sa < 0 { magnitude.reverse() } else { magnitude }
    }
}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl fmt::Display for BigNum {
    /// Round-trippable scientific form, e.g. `1.5e100`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}e{}", self.mantissa, self.exponent)
    }
}

impl FromStr for BigNum {
    type Err = ConversionError;

    /// Parses plain decimals and scientific notation, including exponents
    /// far outside `f64` range (`"1e400"` works). Digits beyond the 17th
    /// significant digit are dropped.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || ConversionError::Malformed(input.to_string());
        let s = input.trim();
        let (sign, s) = match s.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, s.strip_prefix('+').unwrap_or(s)),
        };
        if s.is_empty() {
            return Err(malformed());
        }

        let (num, exp) = match s.split_once(['e', 'E']) {
            Some((num, exp_str)) => (num, parse_exponent(exp_str).ok_or_else(malformed)?),
            None => (s, 0),
        };

        let (int_part, frac_part) = match num.split_once('.') {
            Some((i, f)) => (i, f),
            None => (num, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let digits: String = int_part.bytes().chain(frac_part.bytes()).map(char::from).collect();
        let Some(first_sig) = digits.find(|c| c != '0') else {
            return Ok(Self::ZERO);
        };

        // Exponent of the first significant digit relative to the decimal point
        let point = int_part.len() as i64;
        let exp_of_first = (point - 1 - first_sig as i64).saturating_add(exp);

        let take_end = digits.len().min(first_sig + 17);
        let significant = &digits[first_sig..take_end];
        let raw: u64 = significant.parse().map_err(|_| malformed())?;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let mantissa = raw as f64 / 10f64.powi(significant.len() as i32 - 1);

        Ok(Self::from_parts(mantissa * sign, exp_of_first))
    }
}

/// Parses an exponent field, saturating instead of failing when the digits
/// overflow `i64` (the value clamps at `±MAX_EXPONENT` downstream anyway).
fn parse_exponent(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if neg { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let v = BigNum::from_parts(1234.5, 0);
        assert!((v.mantissa() - 1.2345).abs() < 1e-12);
        assert_eq!(v.exponent(), 3);
    }

    #[test]
    fn test_normalization_small() {
        let v = BigNum::from_parts(0.05, 0);
        assert!((v.mantissa() - 5.0).abs() < 1e-12);
        assert_eq!(v.exponent(), -2);
    }

    #[test]
    fn test_nan_mantissa_is_zero() {
        assert!(BigNum::from_parts(f64::NAN, 10).is_zero());
        assert!(BigNum::from_f64(f64::INFINITY).is_zero());
    }

    #[test]
    fn test_exponent_saturation() {
        let huge = BigNum::from_parts(5.0, MAX_EXPONENT).mul(BigNum::from_parts(5.0, MAX_EXPONENT));
        assert_eq!(huge.exponent(), MAX_EXPONENT);
        let tiny = BigNum::from_parts(1.0, -MAX_EXPONENT).div(BigNum::from_parts(1.0, MAX_EXPONENT));
        assert!(tiny.is_zero());
    }

    #[test]
    fn test_add_aligned() {
        let a: BigNum = "1e100".parse().unwrap();
        let b: BigNum = "5e99".parse().unwrap();
        let sum = a.add(b);
        assert!((sum.mantissa() - 1.5).abs() < 1e-12);
        assert_eq!(sum.exponent(), 100);
    }

    #[test]
    fn test_add_far_apart_keeps_larger() {
        let a: BigNum = "1.5e100".parse().unwrap();
        let b: BigNum = "1e50".parse().unwrap();
        assert_eq!(a.add(b), a);
    }

    #[test]
    fn test_sub_cancellation() {
        let a: BigNum = "2.5e40".parse().unwrap();
        assert!(a.sub(a).is_zero());
    }

    #[test]
    fn test_mul_div() {
        let a: BigNum = "2e100".parse().unwrap();
        let b: BigNum = "4e50".parse().unwrap();
        let prod = a.mul(b);
        assert!((prod.mantissa() - 8.0).abs() < 1e-12);
        assert_eq!(prod.exponent(), 150);
        let quot = prod.div(b);
        assert!((quot.mantissa() - 2.0).abs() < 1e-9);
        assert_eq!(quot.exponent(), 100);
    }

    #[test]
    fn test_div_by_zero_sentinel() {
        let a: BigNum = "1e20".parse().unwrap();
        assert!(a.div(BigNum::ZERO).is_zero());
    }

    #[test]
    fn test_pow_real() {
        let base = BigNum::from_f64(10.0);
        let v = base.pow(100.0);
        assert_eq!(v.exponent(), 100);
        assert!((v.mantissa() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_powi_matches_pow() {
        let base = BigNum::from_f64(1.08);
        let via_int = base.powi(50);
        let via_log = base.pow(50.0);
        let ratio = via_int.div(via_log).to_f64();
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pow_edges() {
        assert_eq!(BigNum::ZERO.pow(0.0), BigNum::ONE);
        assert!(BigNum::ZERO.pow(3.0).is_zero());
        assert!(BigNum::ZERO.pow(-1.0).is_zero());
        assert!(BigNum::from_f64(-2.0).pow(0.5).is_zero());
        let neg_cube = BigNum::from_f64(-2.0).pow(3.0);
        assert!(neg_cube.is_negative());
    }

    #[test]
    fn test_ordering() {
        let small: BigNum = "9.9e10".parse().unwrap();
        let big: BigNum = "1e11".parse().unwrap();
        assert!(small < big);
        assert!(big.neg() < small.neg());
        assert!(small.neg() < BigNum::ZERO);
        assert!(BigNum::ZERO < small);
    }

    #[test]
    fn test_parse_plain_and_scientific() {
        let v: BigNum = "123.45".parse().unwrap();
        assert!((v.to_f64() - 123.45).abs() < 1e-9);
        let v: BigNum = "-2.5e-3".parse().unwrap();
        assert!((v.to_f64() + 0.0025).abs() < 1e-12);
        let v: BigNum = "1e400".parse().unwrap();
        assert_eq!(v.exponent(), 400);
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!("".parse::<BigNum>().is_err());
        assert!("abc".parse::<BigNum>().is_err());
        assert!("1.2.3".parse::<BigNum>().is_err());
        assert!("1e".parse::<BigNum>().is_err());
        assert!("--5".parse::<BigNum>().is_err());
    }

    #[test]
    fn test_parse_huge_exponent_saturates() {
        let v: BigNum = "1e99999999999999999999".parse().unwrap();
        assert_eq!(v.exponent(), MAX_EXPONENT);
    }

    #[test]
    fn test_display_round_trip() {
        let v: BigNum = "1.5e100".parse().unwrap();
        let back: BigNum = v.to_string().parse().unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn test_to_f64_saturates() {
        let v: BigNum = "1e400".parse().unwrap();
        assert_eq!(v.to_f64(), f64::MAX);
        assert_eq!(v.neg().to_f64(), -f64::MAX);
    }
}
