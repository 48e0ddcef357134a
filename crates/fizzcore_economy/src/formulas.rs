//! # Economy Formulas
//!
//! Pure functions only: no shared state, defined for every finite input.
//! Anything coercible through `fizzcore_numeric` is a valid argument;
//! negative or degenerate inputs degrade to the no-bonus baseline instead
//! of erroring.

use fizzcore_numeric::NumValue;

use crate::tuning::EconomyTuning;

/// Production contributed by `count` units of one resource:
/// `count * base_per_unit * (1 + upgrade_level * upgrade_per_level)`.
///
/// Above `production_soft_cap` the excess is compressed
/// (`cap * (raw/cap)^soft_cap_compression`) so late-game numbers keep
/// rising without becoming unreadable. Negative counts, base rates and
/// upgrade inputs are treated as zero, so production is never negative.
#[must_use]
pub fn unit_production(
    tuning: &EconomyTuning,
    count: NumValue,
    base_per_unit: NumValue,
    upgrade_level: NumValue,
    upgrade_per_level: NumValue,
) -> NumValue {
    let count = count.max(NumValue::ZERO);
    let base = base_per_unit.max(NumValue::ZERO);
    let level = upgrade_level.max(NumValue::ZERO);
    let per_level = upgrade_per_level.max(NumValue::ZERO);

    let multiplier = NumValue::ONE.add(level.mul(per_level));
    let raw = count.mul(base).mul(multiplier);
    soft_cap(tuning, raw)
}

/// Compresses production above the soft cap; identity below it.
fn soft_cap(tuning: &EconomyTuning, raw: NumValue) -> NumValue {
    let cap = NumValue::coerce_f64(tuning.production_soft_cap);
    if raw.lte(cap) {
        return raw;
    }
    let compression = NumValue::coerce_f64(tuning.soft_cap_compression);
    cap.mul(raw.div(cap).pow(compression))
}

/// Aggregate production of two resource lines:
/// `count_a * prod_a + count_b * prod_b`, times a bounded synergy
/// multiplier once both counts exceed `synergy_threshold`.
///
/// The multiplier is `1 + synergy_max_bonus * (1 - threshold/min_count)`,
/// which approaches `1 + synergy_max_bonus` asymptotically and therefore
/// never reaches 1.1x: synergy flavors the sum, it never dominates it.
#[must_use]
pub fn aggregate_production(
    tuning: &EconomyTuning,
    count_a: NumValue,
    prod_a: NumValue,
    count_b: NumValue,
    prod_b: NumValue,
) -> NumValue {
    let base = count_a.mul(prod_a).add(count_b.mul(prod_b));

    let threshold = NumValue::coerce_f64(tuning.synergy_threshold);
    if !(count_a.gt(threshold) && count_b.gt(threshold)) {
        return base;
    }
    let smaller = count_a.min(count_b);
    let ramp = NumValue::ONE.sub(threshold.div(smaller));
    let multiplier = NumValue::ONE.add(NumValue::coerce_f64(tuning.synergy_max_bonus).mul(ramp));
    base.mul(multiplier)
}

/// Converts standing production into output per drink cycle, with
/// diminishing returns: linear up to `diminishing_knee`, power-compressed
/// (`knee * (p/knee)^diminishing_power`) above it.
///
/// Monotone non-decreasing in `total_production` and finite for all finite
/// inputs, however astronomical.
#[must_use]
pub fn output_per_cycle(
    tuning: &EconomyTuning,
    base_output: NumValue,
    total_production: NumValue,
) -> NumValue {
    let production = total_production.max(NumValue::ZERO);
    let knee = NumValue::coerce_f64(tuning.diminishing_knee);
    if production.lte(knee) {
        return base_output.add(production);
    }
    let power = NumValue::coerce_f64(tuning.diminishing_power);
    base_output.add(knee.mul(production.div(knee).pow(power)))
}

/// Exponential purchase cost: `base_cost * scaling^owned`.
///
/// The exponent is explicitly clamped to `[0, max_cost_exponent]` before
/// exponentiation: a corrupted owned-counter must not explode the curve.
/// Zero or negative owned counts, and degenerate scaling factors, yield
/// exactly the unmodified base cost.
#[must_use]
pub fn purchase_cost(
    tuning: &EconomyTuning,
    owned: NumValue,
    base_cost: NumValue,
    scaling: NumValue,
) -> NumValue {
    if scaling.lte(NumValue::ZERO) {
        return base_cost;
    }
    let exponent = clamp_cost_exponent(tuning, owned);
    if exponent == 0 {
        return base_cost;
    }
    base_cost.mul(scaling.powi(exponent))
}

/// Clamps an owned-count to the sane exponent range, logging when the
/// ceiling engages (that only happens with corrupted state).
#[must_use]
pub fn clamp_cost_exponent(tuning: &EconomyTuning, owned: NumValue) -> u64 {
    let ceiling = NumValue::from(tuning.max_cost_exponent);
    if owned.gte(ceiling) {
        tracing::warn!(
            max = tuning.max_cost_exponent,
            "owned-count above cost exponent ceiling, clamping"
        );
        return tuning.max_cost_exponent;
    }
    let raw = owned.to_safe_f64();
    if raw <= 0.0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = raw.floor() as u64;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> EconomyTuning {
        EconomyTuning::default()
    }

    #[test]
    fn test_straw_production_baseline() {
        // 5 straws at 0.6 sips each, no upgrades
        let v = unit_production(
            &tuning(),
            NumValue::from(5u32),
            NumValue::coerce_f64(0.6),
            NumValue::ZERO,
            NumValue::ONE,
        );
        assert!((v.to_safe_f64() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_production_with_upgrades() {
        // 10 units * 2.0 base * (1 + 3 * 0.5) = 50
        let v = unit_production(
            &tuning(),
            NumValue::from(10u32),
            NumValue::coerce_f64(2.0),
            NumValue::from(3u32),
            NumValue::coerce_f64(0.5),
        );
        assert!((v.to_safe_f64() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_count_is_zero() {
        let v = unit_production(
            &tuning(),
            NumValue::coerce_f64(-5.0),
            NumValue::coerce_f64(0.6),
            NumValue::ZERO,
            NumValue::ONE,
        );
        assert!(v.is_zero());
    }

    #[test]
    fn test_negative_base_rate_is_zero() {
        // A negative per-unit rate must not produce negative output
        let v = unit_production(
            &tuning(),
            NumValue::from(5u32),
            NumValue::coerce_f64(-0.6),
            NumValue::from(3u32),
            NumValue::coerce_f64(0.5),
        );
        assert!(v.is_zero());
        assert!(!v.is_negative());
    }

    #[test]
    fn test_soft_cap_compresses() {
        let t = tuning();
        let raw = NumValue::coerce_str("1e120");
        let capped = unit_production(&t, raw, NumValue::ONE, NumValue::ZERO, NumValue::ZERO);
        // 1e100 * (1e120/1e100)^0.5 = 1e110
        assert_eq!(capped.promote().exponent(), 110);
        // Still monotone: more raw production -> more capped production
        let more = unit_production(
            &t,
            NumValue::coerce_str("1e121"),
            NumValue::ONE,
            NumValue::ZERO,
            NumValue::ZERO,
        );
        assert!(more.gt(capped));
    }

    #[test]
    fn test_aggregate_no_synergy_below_threshold() {
        let v = aggregate_production(
            &tuning(),
            NumValue::from(50u32),
            NumValue::coerce_f64(2.0),
            NumValue::from(150u32),
            NumValue::coerce_f64(2.0),
        );
        assert!((v.to_safe_f64() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_synergy_bounded() {
        let v = aggregate_production(
            &tuning(),
            NumValue::from(150u32),
            NumValue::coerce_f64(2.0),
            NumValue::from(150u32),
            NumValue::coerce_f64(2.0),
        );
        let out = v.to_safe_f64();
        assert!(out > 600.0, "synergy should add something, got {out}");
        assert!(out < 660.0, "synergy must stay below 1.1x, got {out}");
    }

    #[test]
    fn test_output_linear_below_knee() {
        let v = output_per_cycle(&tuning(), NumValue::ONE, NumValue::coerce_f64(500.0));
        assert!((v.to_safe_f64() - 501.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_diminishes_above_knee_and_stays_monotone() {
        let t = tuning();
        let at_knee = output_per_cycle(&t, NumValue::ZERO, NumValue::coerce_f64(1e6));
        let above = output_per_cycle(&t, NumValue::ZERO, NumValue::coerce_f64(1e8));
        let huge = output_per_cycle(&t, NumValue::ZERO, NumValue::coerce_str("1e5000"));
        assert!(above.gt(at_knee));
        assert!(huge.gt(above));
        // Compressed: 1e6 * (1e8/1e6)^0.85 < 1e8
        assert!(above.lt(NumValue::coerce_f64(1e8)));
    }

    #[test]
    fn test_purchase_cost_baseline_and_step() {
        let t = tuning();
        let c0 = purchase_cost(&t, NumValue::ZERO, NumValue::coerce_f64(5.0), NumValue::coerce_f64(1.08));
        assert!((c0.to_safe_f64() - 5.0).abs() < 1e-12);
        let c1 = purchase_cost(&t, NumValue::ONE, NumValue::coerce_f64(5.0), NumValue::coerce_f64(1.08));
        assert!((c1.to_safe_f64() - 5.4).abs() < 1e-12);
    }

    #[test]
    fn test_purchase_cost_monotone() {
        let t = tuning();
        let mut previous = NumValue::ZERO;
        for owned in 0u32..200 {
            let cost = purchase_cost(
                &t,
                NumValue::from(owned),
                NumValue::coerce_f64(5.0),
                NumValue::coerce_f64(1.08),
            );
            assert!(cost.gt(previous), "cost must grow at owned={owned}");
            previous = cost;
        }
    }

    #[test]
    fn test_cost_exponent_clamped_for_corrupt_counter() {
        let t = tuning();
        let clamped = clamp_cost_exponent(&t, NumValue::coerce_str("1e50"));
        assert_eq!(clamped, t.max_cost_exponent);
        assert_eq!(clamp_cost_exponent(&t, NumValue::coerce_f64(-3.0)), 0);
        assert_eq!(clamp_cost_exponent(&t, NumValue::coerce_f64(7.9)), 7);
    }
}
