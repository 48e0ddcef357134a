//! # Numeric Conversion Errors
//!
//! Errors produced by the strict conversion layer. The lenient public API
//! (`coerce_*`) never surfaces these; it applies the documented zero
//! fallback instead.

use thiserror::Error;

/// Errors that can occur while converting foreign input into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Input was NaN or an infinity. These must never enter engine math.
    #[error("non-finite input rejected")]
    NonFinite,

    /// Input string was not a decimal or scientific-notation number.
    #[error("malformed numeric string: {0:?}")]
    Malformed(String),

    /// A foreign object exposed neither a usable float nor a parseable
    /// string form.
    #[error("foreign value has no usable numeric form")]
    Unusable,
}

/// Result type for strict numeric conversions.
pub type NumericResult<T> = Result<T, ConversionError>;
