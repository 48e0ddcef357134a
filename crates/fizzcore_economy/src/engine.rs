//! # Economy Engine
//!
//! The central coordinator: owns the tuning and the memoization caches and
//! drives the Quote -> Validate -> Commit | Reject purchase flow.
//!
//! ## The Purchase Pipeline
//!
//! ```text
//! Host requests purchase -> evaluate_purchase() ->
//!   1. Sanitize inputs (corrupt counters replaced, logged)
//!   2. Quote cost (memoized exponentiation, clamped exponent)
//!   3. Validate funds (safe comparison, any magnitude)
//!   4. Commit one atomic bundle of derived values | Reject sentinel
//! ```
//!
//! Cache lifetime is tied to the engine instance, not the process: tests
//! and hosts can run engines side by side without cross-talk. The caches
//! sit behind a mutex so the `&self` API stays sound on a threaded host.

use fizzcore_numeric::NumValue;
use parking_lot::Mutex;

use crate::cache::{compound_growth, pow_key, raw_pow, CacheStats, LruCache};
use crate::error::{EconomyError, EconomyResult};
use crate::formulas::{
    aggregate_production, clamp_cost_exponent, output_per_cycle, unit_production,
};
use crate::purchase::{
    sanitize_counter, CommitBundle, PurchasableKind, PurchaseOutcome, PurchaseSpec,
    RejectReason, ResourceCounters, SanitizeReport,
};
use crate::tuning::EconomyTuning;

/// The economy engine. Cheap to construct; one per game session.
pub struct EconomyEngine {
    tuning: EconomyTuning,
    pow_cache: Mutex<LruCache<String, NumValue>>,
}

impl Default for EconomyEngine {
    fn default() -> Self {
        Self::new(EconomyTuning::default())
    }
}

impl EconomyEngine {
    /// Creates an engine with the given tuning.
    #[must_use]
    pub fn new(tuning: EconomyTuning) -> Self {
        let capacity = tuning.pow_cache_capacity;
        Self { tuning, pow_cache: Mutex::new(LruCache::new(capacity)) }
    }

    /// The engine's tuning knobs.
    #[must_use]
    pub fn tuning(&self) -> &EconomyTuning {
        &self.tuning
    }

    /// Memoized exponentiation. A cache hit returns a value equal to a
    /// fresh computation; clearing the cache never changes results.
    #[must_use]
    pub fn memoized_pow(&self, base: NumValue, exp: NumValue) -> NumValue {
        let key = pow_key(base, exp);
        let mut cache = self.pow_cache.lock();
        if let Some(hit) = cache.get(&key) {
            return hit;
        }
        let value = raw_pow(base, exp);
        cache.insert(key, value);
        value
    }

    /// Purchase cost with the exponent clamp of
    /// [`crate::formulas::purchase_cost`] and memoized exponentiation.
    #[must_use]
    pub fn purchase_cost(&self, owned: NumValue, base_cost: NumValue, scaling: NumValue) -> NumValue {
        if scaling.lte(NumValue::ZERO) {
            return base_cost;
        }
        let exponent = clamp_cost_exponent(&self.tuning, owned);
        if exponent == 0 {
            return base_cost;
        }
        base_cost.mul(self.memoized_pow(scaling, NumValue::from(exponent)))
    }

    /// Compound growth over `ticks` cycles, switching to binary
    /// exponentiation past the configured threshold.
    #[must_use]
    pub fn compound_growth(&self, base: NumValue, rate: NumValue, ticks: u64) -> NumValue {
        compound_growth(base, rate, ticks, self.tuning.growth_binary_threshold)
    }

    /// Quotes the cost of the next unit.
    ///
    /// # Errors
    ///
    /// [`EconomyError::InvalidQuote`] when the computed cost is not
    /// strictly positive; nothing is charged on an invalid quote.
    pub fn quote(&self, spec: &PurchaseSpec) -> EconomyResult<NumValue> {
        let cost = self.purchase_cost(spec.owned, spec.base_cost, spec.scaling);
        if cost.lte(NumValue::ZERO) {
            return Err(EconomyError::InvalidQuote {
                reason: format!("non-positive cost {cost} for base {}", spec.base_cost),
            });
        }
        Ok(cost)
    }

    /// Evaluates one purchase attempt against a sips balance.
    ///
    /// Commits as one atomic bundle or rejects without side effects; see
    /// the module docs for the pipeline. Corrupted inputs are sanitized
    /// and the substitutions reported in the bundle.
    #[must_use]
    pub fn evaluate_purchase(&self, balance: NumValue, spec: &PurchaseSpec) -> PurchaseOutcome {
        // Step 1: sanitize the inputs the quote and validation depend on
        let mut sanitized = SanitizeReport::default();
        let balance = sanitize_counter(&self.tuning, "sips", balance, &mut sanitized);
        let owned = sanitize_counter(&self.tuning, "owned", spec.owned, &mut sanitized);
        let other_count =
            sanitize_counter(&self.tuning, "other_count", spec.other_count, &mut sanitized);

        // Step 2: quote
        let quoted = PurchaseSpec { owned, other_count, ..*spec };
        let cost = match self.quote(&quoted) {
            Ok(cost) => cost,
            Err(error) => {
                tracing::debug!(%error, "purchase rejected at quote");
                return PurchaseOutcome::Rejected(RejectReason::InvalidQuote);
            }
        };

        // Step 3: validate funds
        if !balance.gte(cost) {
            return PurchaseOutcome::Rejected(RejectReason::InsufficientFunds);
        }

        // Step 4: commit - every derived value recomputed from the new count
        let new_count = owned.add(NumValue::ONE);
        let new_balance = balance.sub(cost);
        let new_unit_production = unit_production(
            &self.tuning,
            new_count,
            quoted.base_per_unit,
            quoted.upgrade_level,
            quoted.upgrade_per_level,
        );
        let per_unit = unit_production(
            &self.tuning,
            NumValue::ONE,
            quoted.base_per_unit,
            quoted.upgrade_level,
            quoted.upgrade_per_level,
        );
        let new_aggregate_production = aggregate_production(
            &self.tuning,
            new_count,
            per_unit,
            other_count,
            quoted.other_production,
        );
        let new_output_per_cycle =
            output_per_cycle(&self.tuning, quoted.base_output, new_aggregate_production);

        PurchaseOutcome::Committed(CommitBundle {
            new_count,
            new_balance,
            cost,
            new_unit_production,
            new_aggregate_production,
            new_output_per_cycle,
            sanitized,
        })
    }

    /// Runs a purchase against live counters: the bundle is applied
    /// atomically on commit, and a reject leaves the counters untouched.
    pub fn try_purchase(
        &self,
        counters: &mut ResourceCounters,
        kind: PurchasableKind,
        spec: &PurchaseSpec,
    ) -> PurchaseOutcome {
        let mut spec = *spec;
        spec.owned = counters.count_of(kind);
        let outcome = self.evaluate_purchase(counters.sips, &spec);
        if let PurchaseOutcome::Committed(bundle) = &outcome {
            counters.apply(kind, bundle);
        }
        outcome
    }

    /// Drops all cached computations. Latency-only: results are identical
    /// before and after.
    pub fn clear_caches(&self) {
        self.pow_cache.lock().clear();
    }

    /// Diagnostic counters for the pow cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.pow_cache.lock().stats()
    }
}
