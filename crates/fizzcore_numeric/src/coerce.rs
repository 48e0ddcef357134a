//! # Input Coercion
//!
//! The engine accepts numbers from the host in several shapes: native
//! floats, numeric strings, its own values, and foreign arbitrary-precision
//! objects. [`Coercible`] is the explicit two-capability boundary trait for
//! the last group; adapters live at the host boundary, not inside formulas.

use crate::error::{ConversionError, NumericResult};
use crate::value::{NumValue, SAFE_FLOAT_LIMIT};

/// A foreign numeric type the engine can ingest.
///
/// Exactly two capabilities are required: a (possibly saturating) float
/// view, and a decimal/scientific string view that preserves full magnitude.
pub trait Coercible {
    /// Float view. May be non-finite or saturated for huge magnitudes;
    /// coercion falls back to the string view in that case.
    fn to_f64(&self) -> f64;

    /// Full-magnitude decimal or scientific-notation string view.
    fn to_decimal_string(&self) -> String;
}

impl Coercible for NumValue {
    fn to_f64(&self) -> f64 {
        // Saturating view; extended values route through the string form
        self.approx_f64()
    }

    fn to_decimal_string(&self) -> String {
        match self {
            Self::Plain(v) => format!("{v}"),
            Self::Big(b) => b.to_string(),
        }
    }
}

impl Coercible for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }

    fn to_decimal_string(&self) -> String {
        format!("{self}")
    }
}

impl NumValue {
    /// Strict coercion from a foreign numeric object.
    ///
    /// Prefers the float view while it is trustworthy (finite, below
    /// [`SAFE_FLOAT_LIMIT`]); beyond that the string view carries the
    /// magnitude the float cannot.
    ///
    /// # Errors
    ///
    /// [`ConversionError::Unusable`] when neither view yields a number.
    pub fn try_coerce(source: &dyn Coercible) -> NumericResult<Self> {
        let float = source.to_f64();
        if float.is_finite() && float.abs() < SAFE_FLOAT_LIMIT {
            return Self::from_f64(float);
        }
        match source.to_decimal_string().parse::<Self>() {
            Ok(value) => Ok(value),
            Err(_) if float.is_finite() => Self::from_f64(float),
            Err(_) => Err(ConversionError::Unusable),
        }
    }

    /// Lenient coercion: any failure degrades to zero.
    #[must_use]
    pub fn coerce(source: &dyn Coercible) -> Self {
        Self::try_coerce(source).unwrap_or(Self::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in for a legacy arbitrary-precision type: float view saturates,
    /// string view keeps the magnitude.
    struct LegacyDecimal {
        float_view: f64,
        string_view: &'static str,
    }

    impl Coercible for LegacyDecimal {
        fn to_f64(&self) -> f64 {
            self.float_view
        }

        fn to_decimal_string(&self) -> String {
            self.string_view.to_string()
        }
    }

    #[test]
    fn test_small_foreign_value_uses_float_view() {
        let foreign = LegacyDecimal { float_view: 1234.5, string_view: "1234.5" };
        let v = NumValue::try_coerce(&foreign).unwrap();
        assert_eq!(v.to_safe_f64(), 1234.5);
    }

    #[test]
    fn test_huge_foreign_value_uses_string_view() {
        let foreign = LegacyDecimal { float_view: f64::INFINITY, string_view: "2.5e5000" };
        let v = NumValue::try_coerce(&foreign).unwrap();
        assert_eq!(v.promote().exponent(), 5000);
    }

    #[test]
    fn test_unusable_foreign_value() {
        let foreign = LegacyDecimal { float_view: f64::NAN, string_view: "not a number" };
        assert_eq!(NumValue::try_coerce(&foreign), Err(ConversionError::Unusable));
        assert!(NumValue::coerce(&foreign).is_zero());
    }

    #[test]
    fn test_own_value_round_trips() {
        let v = NumValue::coerce_str("3.75e200");
        assert_eq!(NumValue::try_coerce(&v).unwrap(), v);
    }
}
