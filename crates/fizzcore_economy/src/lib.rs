//! # FIZZCORE Economy
//!
//! The economy engine of the FIZZCORE idle game: production and cost
//! formulas over unlimited-scale numbers, bounded memoization for the hot
//! exponentiations, and a transactional purchase evaluator.
//!
//! ## Design Principles
//!
//! 1. **Fail-soft** - corrupted counters are sanitized and reported, never
//!    panicked on; every formula is defined for every finite input
//! 2. **Pure formulas, stateful engine** - [`formulas`] is side-effect
//!    free; [`EconomyEngine`] layers caching and the purchase pipeline on
//!    top
//! 3. **Atomic purchases** - a purchase commits as one
//!    [`CommitBundle`] or rejects without touching anything
//! 4. **Caches are invisible** - clearing a cache can change latency,
//!    never a result
//!
//! ## Example
//!
//! ```rust,ignore
//! use fizzcore_economy::{EconomyEngine, PurchaseSpec};
//! use fizzcore_numeric::NumValue;
//!
//! let engine = EconomyEngine::default();
//! let outcome = engine.evaluate_purchase(NumValue::coerce_f64(100.0), &spec);
//! if let PurchaseOutcome::Committed(bundle) = outcome {
//!     counters.apply(kind, &bundle);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod engine;
pub mod error;
pub mod formulas;
pub mod migrate;
pub mod purchase;
pub mod tuning;

pub use cache::{CacheStats, LruCache};
pub use engine::EconomyEngine;
pub use error::{EconomyError, EconomyResult};
pub use purchase::{
    CommitBundle, PurchasableKind, PurchaseOutcome, PurchaseSpec, RawCounters, RejectReason,
    ResourceCounters, SanitizeReport, Substitution,
};
pub use tuning::EconomyTuning;
