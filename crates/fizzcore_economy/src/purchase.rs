//! # Purchase Evaluation
//!
//! **Transactional affordability flow: Quote -> Validate -> Commit | Reject**
//!
//! A purchase either commits as one atomic bundle of derived values or
//! rejects without touching anything. Applying part of a bundle (say, the
//! count without the dependent production) is a correctness bug, so the
//! bundle is applied through one method.
//!
//! ## Sanitization
//!
//! Corrupted counters (non-finite raw input, or magnitudes beyond the
//! sanity ceiling) are replaced with documented nonzero fallbacks before
//! evaluation, logged, and reported. Gameplay continues; nothing halts.

use fizzcore_numeric::NumValue;
use serde::{Deserialize, Serialize};

use crate::tuning::EconomyTuning;

/// The game's resource counters, all unlimited-scale values.
///
/// Invariant: no counter is negative after a successful mutation; a
/// rejected purchase leaves every counter unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCounters {
    /// Owned straws.
    pub straws: NumValue,
    /// Owned cups.
    pub cups: NumValue,
    /// Owned suctions.
    pub suctions: NumValue,
    /// Wider-straw upgrade level.
    pub wider_straws: NumValue,
    /// Better-cup upgrade level.
    pub better_cups: NumValue,
    /// Faster-drink upgrade level.
    pub faster_drinks: NumValue,
    /// Critical-click upgrade level.
    pub critical_clicks: NumValue,
    /// Player level.
    pub level: NumValue,
    /// Spendable sips.
    pub sips: NumValue,
    /// Lifetime sips earned (never spent down).
    pub total_sips_earned: NumValue,
}

/// Raw counter snapshot as the host hands it over. Floats here are
/// untrusted: NaN and infinities are expected failure modes of a corrupted
/// save.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawCounters {
    /// Owned straws.
    pub straws: f64,
    /// Owned cups.
    pub cups: f64,
    /// Owned suctions.
    pub suctions: f64,
    /// Wider-straw upgrade level.
    pub wider_straws: f64,
    /// Better-cup upgrade level.
    pub better_cups: f64,
    /// Faster-drink upgrade level.
    pub faster_drinks: f64,
    /// Critical-click upgrade level.
    pub critical_clicks: f64,
    /// Player level.
    pub level: f64,
    /// Spendable sips.
    pub sips: f64,
    /// Lifetime sips earned.
    pub total_sips_earned: f64,
}

/// One sanitization substitution, surfaced for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Substitution {
    /// The counter that was replaced.
    pub field: &'static str,
    /// The fallback it now holds.
    pub fallback: NumValue,
}

/// Everything the sanitizer changed during one evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SanitizeReport {
    /// Substitutions performed, in field order.
    pub substitutions: Vec<Substitution>,
}

impl SanitizeReport {
    /// True when nothing needed replacing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.substitutions.is_empty()
    }

    fn record(&mut self, field: &'static str, fallback: NumValue) {
        tracing::warn!(field, fallback = %fallback, "counter sanitized");
        self.substitutions.push(Substitution { field, fallback });
    }
}

/// Sanitizes one raw float into a counter value.
///
/// Non-finite input and magnitudes beyond the sanity ceiling become
/// `fallback`; negatives clamp to zero. Returns the value and whether a
/// substitution happened.
#[must_use]
pub fn sanitize_raw(
    tuning: &EconomyTuning,
    raw: f64,
    fallback: NumValue,
) -> (NumValue, bool) {
    if !raw.is_finite() || raw.abs() >= tuning.counter_sanity_ceiling {
        return (fallback, true);
    }
    if raw < 0.0 {
        return (NumValue::ZERO, true);
    }
    (NumValue::coerce_f64(raw), false)
}

fn sanitize_value(tuning: &EconomyTuning, value: NumValue, fallback: NumValue) -> (NumValue, bool) {
    let ceiling = NumValue::coerce_f64(tuning.counter_sanity_ceiling);
    if value.gte(ceiling) {
        return (fallback, true);
    }
    if value.is_negative() {
        return (NumValue::ZERO, true);
    }
    (value, false)
}

/// Sanitizes one already-coerced counter value, recording any substitution
/// in the report. The fallback is chosen by field name: currency fields get
/// the resource fallback, everything else the counter fallback.
#[must_use]
pub fn sanitize_counter(
    tuning: &EconomyTuning,
    field: &'static str,
    value: NumValue,
    report: &mut SanitizeReport,
) -> NumValue {
    let fallback = fallback_for(tuning, field);
    let (value, substituted) = sanitize_value(tuning, value, fallback);
    if substituted {
        report.record(field, value);
    }
    value
}

impl ResourceCounters {
    /// Builds counters from a raw snapshot, sanitizing every field.
    #[must_use]
    pub fn from_raw(tuning: &EconomyTuning, raw: &RawCounters) -> (Self, SanitizeReport) {
        let mut counters = Self {
            straws: NumValue::coerce_f64(raw.straws),
            cups: NumValue::coerce_f64(raw.cups),
            suctions: NumValue::coerce_f64(raw.suctions),
            wider_straws: NumValue::coerce_f64(raw.wider_straws),
            better_cups: NumValue::coerce_f64(raw.better_cups),
            faster_drinks: NumValue::coerce_f64(raw.faster_drinks),
            critical_clicks: NumValue::coerce_f64(raw.critical_clicks),
            level: NumValue::coerce_f64(raw.level),
            sips: NumValue::coerce_f64(raw.sips),
            total_sips_earned: NumValue::coerce_f64(raw.total_sips_earned),
        };
        let mut report = SanitizeReport::default();
        // Lenient coercion already mapped NaN/Infinity to zero; restore the
        // nonzero fallbacks for the fields the raw floats corrupted.
        let raw_fields: [(&'static str, f64, &mut NumValue); 10] = [
            ("straws", raw.straws, &mut counters.straws),
            ("cups", raw.cups, &mut counters.cups),
            ("suctions", raw.suctions, &mut counters.suctions),
            ("wider_straws", raw.wider_straws, &mut counters.wider_straws),
            ("better_cups", raw.better_cups, &mut counters.better_cups),
            ("faster_drinks", raw.faster_drinks, &mut counters.faster_drinks),
            ("critical_clicks", raw.critical_clicks, &mut counters.critical_clicks),
            ("level", raw.level, &mut counters.level),
            ("sips", raw.sips, &mut counters.sips),
            ("total_sips_earned", raw.total_sips_earned, &mut counters.total_sips_earned),
        ];
        for (field, raw_value, slot) in raw_fields {
            let fallback = fallback_for(tuning, field);
            let (value, substituted) = sanitize_raw(tuning, raw_value, fallback);
            if substituted {
                *slot = value;
                report.record(field, value);
            }
        }
        (counters, report)
    }

    /// Sanitizes the counters in place. A no-op on already-valid counters
    /// (idempotent: a second pass reports nothing).
    pub fn sanitize(&mut self, tuning: &EconomyTuning) -> SanitizeReport {
        let mut report = SanitizeReport::default();
        let fields: [(&'static str, &mut NumValue); 10] = [
            ("straws", &mut self.straws),
            ("cups", &mut self.cups),
            ("suctions", &mut self.suctions),
            ("wider_straws", &mut self.wider_straws),
            ("better_cups", &mut self.better_cups),
            ("faster_drinks", &mut self.faster_drinks),
            ("critical_clicks", &mut self.critical_clicks),
            ("level", &mut self.level),
            ("sips", &mut self.sips),
            ("total_sips_earned", &mut self.total_sips_earned),
        ];
        for (field, slot) in fields {
            let fallback = fallback_for(tuning, field);
            let (value, substituted) = sanitize_value(tuning, *slot, fallback);
            if substituted {
                *slot = value;
                report.record(field, value);
            }
        }
        report
    }

    /// Current owned count for a purchasable kind.
    #[must_use]
    pub fn count_of(&self, kind: PurchasableKind) -> NumValue {
        match kind {
            PurchasableKind::Straws => self.straws,
            PurchasableKind::Cups => self.cups,
            PurchasableKind::Suctions => self.suctions,
            PurchasableKind::WiderStraws => self.wider_straws,
            PurchasableKind::BetterCups => self.better_cups,
            PurchasableKind::FasterDrinks => self.faster_drinks,
            PurchasableKind::CriticalClicks => self.critical_clicks,
        }
    }

    /// Applies a committed purchase as one unit: the new count and the new
    /// balance land together or not at all.
    pub fn apply(&mut self, kind: PurchasableKind, bundle: &CommitBundle) {
        let slot = match kind {
            PurchasableKind::Straws => &mut self.straws,
            PurchasableKind::Cups => &mut self.cups,
            PurchasableKind::Suctions => &mut self.suctions,
            PurchasableKind::WiderStraws => &mut self.wider_straws,
            PurchasableKind::BetterCups => &mut self.better_cups,
            PurchasableKind::FasterDrinks => &mut self.faster_drinks,
            PurchasableKind::CriticalClicks => &mut self.critical_clicks,
        };
        *slot = bundle.new_count;
        self.sips = bundle.new_balance;
    }
}

fn fallback_for(tuning: &EconomyTuning, field: &'static str) -> NumValue {
    match field {
        "sips" | "total_sips_earned" => NumValue::coerce_f64(tuning.resource_fallback),
        _ => NumValue::coerce_f64(tuning.counter_fallback),
    }
}

/// The things a purchase can buy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PurchasableKind {
    /// A straw (base producer).
    Straws,
    /// A cup (second producer).
    Cups,
    /// A suction upgrade.
    Suctions,
    /// Wider-straw upgrade.
    WiderStraws,
    /// Better-cup upgrade.
    BetterCups,
    /// Faster-drink upgrade.
    FasterDrinks,
    /// Critical-click upgrade.
    CriticalClicks,
}

/// Balance and curve parameters for one purchase attempt. Counts and
/// prices arrive through the coercion layer; corrupted values have already
/// been sanitized by the time this is evaluated.
#[derive(Clone, Copy, Debug)]
pub struct PurchaseSpec {
    /// Owned count of the thing being bought.
    pub owned: NumValue,
    /// Base cost of the first unit.
    pub base_cost: NumValue,
    /// Cost curve scaling factor (e.g. 1.08).
    pub scaling: NumValue,
    /// Base production per unit of this resource.
    pub base_per_unit: NumValue,
    /// Upgrade level applying to this resource.
    pub upgrade_level: NumValue,
    /// Production bonus per upgrade level.
    pub upgrade_per_level: NumValue,
    /// Count of the companion resource line (for aggregate/synergy).
    pub other_count: NumValue,
    /// Per-unit production of the companion line.
    pub other_production: NumValue,
    /// Base output added to every drink cycle.
    pub base_output: NumValue,
}

/// The atomic result of a committed purchase. Everything derived from the
/// new count is recomputed here so the caller never mixes old and new
/// state.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitBundle {
    /// Owned count after the purchase.
    pub new_count: NumValue,
    /// Sips balance after paying the quoted cost.
    pub new_balance: NumValue,
    /// The cost that was charged.
    pub cost: NumValue,
    /// Production of the purchased line at the new count.
    pub new_unit_production: NumValue,
    /// Aggregate production including the companion line and synergy.
    pub new_aggregate_production: NumValue,
    /// Output per drink cycle at the new aggregate.
    pub new_output_per_cycle: NumValue,
    /// Substitutions performed while validating inputs.
    pub sanitized: SanitizeReport,
}

/// Why a purchase attempt did not commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The cost quote was non-positive or otherwise unusable.
    InvalidQuote,
    /// The (sanitized) balance does not cover the quoted cost.
    InsufficientFunds,
}

/// Outcome of one purchase attempt. `Rejected` is a pure sentinel: the
/// caller's state is untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseOutcome {
    /// The purchase went through; apply the bundle atomically.
    Committed(CommitBundle),
    /// The purchase did not happen.
    Rejected(RejectReason),
}

impl PurchaseOutcome {
    /// True when the attempt committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}
