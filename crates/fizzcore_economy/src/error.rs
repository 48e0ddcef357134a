//! # Economy Error Types
//!
//! All errors that can occur in the economy engine. Everything here is
//! recovered inside the engine; nothing surfaces to the player as an error,
//! which is why the evaluator logs and substitutes instead of aborting.

use thiserror::Error;

/// Errors that can occur in the economy engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// A cost quote came out non-positive; the purchase is rejected before
    /// any resource is touched.
    #[error("invalid cost quote: {reason}")]
    InvalidQuote {
        /// Why the quote was unusable.
        reason: String,
    },

    /// A resource counter was non-finite or beyond the sanity ceiling and
    /// had to be replaced with the documented fallback.
    #[error("corrupt counter {field}, substituted fallback")]
    CorruptCounter {
        /// The counter that was replaced.
        field: &'static str,
    },

    /// Invalid tuning file.
    #[error("invalid tuning config: {0}")]
    InvalidConfig(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
