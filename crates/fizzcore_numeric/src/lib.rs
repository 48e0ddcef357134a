//! # FIZZCORE Numeric
//!
//! Unlimited-scale numbers for the FIZZCORE economy engine.
//!
//! ## Design Principles
//!
//! 1. **One numeric type** - formulas operate on [`NumValue`] and never
//!    branch on representation
//! 2. **Transparent promotion** - native floats promote to the
//!    mantissa/exponent form the moment they leave the safe range
//! 3. **No panics, no NaN** - malformed input degrades to zero through the
//!    lenient layer; the strict layer reports [`ConversionError`]
//! 4. **Immutability** - every operation returns a new value
//!
//! ## Example
//!
//! ```rust,ignore
//! use fizzcore_numeric::NumValue;
//!
//! let sips = NumValue::coerce_str("1e100");
//! let bonus = NumValue::coerce_str("5e99");
//! assert_eq!(sips.add(bonus).to_string(), "1.50e100");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod big;
pub mod coerce;
pub mod error;
pub mod format;
pub mod value;

pub use big::{BigNum, MAX_EXPONENT};
pub use coerce::Coercible;
pub use error::{ConversionError, NumericResult};
pub use value::{NumValue, SAFE_FLOAT_LIMIT};
