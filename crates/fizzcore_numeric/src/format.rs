//! # Display Formatting
//!
//! Presentation rules for [`NumValue`]:
//!
//! - magnitude below 1e6: grouped decimal (`1,234,567` grouping) with at
//!   most two fractional digits, trailing zeros trimmed
//! - magnitude at or above 1e6: scientific `1.50e100` with two mantissa
//!   digits
//! - extended values format from their own mantissa/exponent; they never
//!   round-trip through a lossy float

use std::fmt;

use crate::value::NumValue;

/// Magnitude at which display switches to scientific notation.
const SCIENTIFIC_THRESHOLD: f64 = 1e6;

impl fmt::Display for NumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(v) if v.abs() < SCIENTIFIC_THRESHOLD => write_grouped(f, *v),
            Self::Plain(v) => {
                #[allow(clippy::cast_possible_truncation)]
                let exponent = v.abs().log10().floor() as i64;
                #[allow(clippy::cast_possible_truncation)]
                let mantissa = v / 10f64.powi(exponent as i32);
                write_scientific(f, mantissa, exponent)
            }
            Self::Big(b) => write_scientific(f, b.mantissa(), b.exponent()),
        }
    }
}

/// Writes `m * 10^e` as `m.mme<e>`, renormalizing when the two-digit
/// rounding carries the mantissa up to 10.
fn write_scientific(f: &mut fmt::Formatter<'_>, mantissa: f64, exponent: i64) -> fmt::Result {
    let (mantissa, exponent) = if mantissa.abs() >= 9.995 {
        (mantissa / 10.0, exponent.saturating_add(1))
    } else {
        (mantissa, exponent)
    };
    write!(f, "{mantissa:.2}e{exponent}")
}

/// Writes a plain value in grouped decimal form with at most two fractional
/// digits, e.g. `12,345.67`.
fn write_grouped(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let frac = frac_part.trim_end_matches('0');
    let is_zero_rendering = grouped == "0" && frac.is_empty();
    if value < 0.0 && !is_zero_rendering {
        f.write_str("-")?;
    }
    f.write_str(&grouped)?;
    if !frac.is_empty() {
        f.write_str(".")?;
        f.write_str(frac)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(s: &str) -> String {
        NumValue::coerce_str(s).to_string()
    }

    #[test]
    fn test_grouped_decimal() {
        assert_eq!(render("3"), "3");
        assert_eq!(render("1234.5"), "1,234.5");
        assert_eq!(render("999999"), "999,999");
        assert_eq!(render("12345.678"), "12,345.68");
        assert_eq!(render("-1234.5"), "-1,234.5");
        assert_eq!(render("0"), "0");
    }

    #[test]
    fn test_fraction_trimming() {
        assert_eq!(render("5.10"), "5.1");
        assert_eq!(render("5.00"), "5");
        assert_eq!(render("0.25"), "0.25");
    }

    #[test]
    fn test_scientific_at_threshold() {
        assert_eq!(render("1000000"), "1.00e6");
        assert_eq!(render("2500000"), "2.50e6");
        assert_eq!(render("-2500000"), "-2.50e6");
    }

    #[test]
    fn test_scientific_big() {
        assert_eq!(render("1.5e100"), "1.50e100");
        assert_eq!(render("9.876e2000"), "9.88e2000");
        assert_eq!(render("-4e50"), "-4.00e50");
    }

    #[test]
    fn test_scientific_rounding_carry() {
        // 9.999e10 rounds to 10.00 at two digits; must carry to 1.00e11
        assert_eq!(render("99990000000"), "1.00e11");
    }

    #[test]
    fn test_negative_small_fraction_has_no_sign_on_zero() {
        assert_eq!(NumValue::coerce_f64(-0.001).to_string(), "0");
    }
}
