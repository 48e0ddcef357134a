//! # Economy Tuning
//!
//! Every threshold the formulas use lives here, not inline in a formula
//! body. Balance can be tuned from a TOML file without touching code; the
//! defaults are the engine's documented constants.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// Tuning knobs for the economy engine.
///
/// Loaded once at startup via [`EconomyTuning::from_toml`]; missing fields
/// fall back to the defaults below.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Raw production above this gets soft-capped (compressed, not
    /// truncated) to keep numbers presentable.
    pub production_soft_cap: f64,

    /// Exponent applied to the excess ratio above the soft cap.
    /// `0.5` means the excess grows as its square root.
    pub soft_cap_compression: f64,

    /// Both resource counts must exceed this before any synergy bonus
    /// applies.
    pub synergy_threshold: f64,

    /// Asymptotic ceiling of the synergy bonus fraction. `0.08` keeps the
    /// multiplier strictly below 1.1x, so synergy never dominates the base
    /// sum.
    pub synergy_max_bonus: f64,

    /// Standing production up to this converts linearly into per-cycle
    /// output; above it, diminishing returns kick in.
    pub diminishing_knee: f64,

    /// Compression power applied above the knee. Below 1.0 so output keeps
    /// rising, just slower.
    pub diminishing_power: f64,

    /// Owned-count ceiling applied before cost exponentiation. Guards
    /// against corrupted counters exploding `scale^owned`.
    pub max_cost_exponent: u64,

    /// Counters above this are considered corrupted and sanitized.
    pub counter_sanity_ceiling: f64,

    /// Fallback for a corrupted item counter. Deliberately nonzero: a
    /// zeroed counter would soft-lock dependent production.
    pub counter_fallback: f64,

    /// Fallback for a corrupted currency balance. Enough to escape a
    /// soft-lock at early-game prices.
    pub resource_fallback: f64,

    /// Capacity of the memoized-exponentiation cache.
    pub pow_cache_capacity: usize,

    /// Tick count at which compound growth switches from naive repeated
    /// multiplication to binary exponentiation.
    pub growth_binary_threshold: u64,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            production_soft_cap: 1e100,
            soft_cap_compression: 0.5,
            synergy_threshold: 100.0,
            synergy_max_bonus: 0.08,
            diminishing_knee: 1e6,
            diminishing_power: 0.85,
            max_cost_exponent: 1_000_000,
            counter_sanity_ceiling: 1e200,
            counter_fallback: 1.0,
            resource_fallback: 100.0,
            pow_cache_capacity: 256,
            growth_binary_threshold: 1000,
        }
    }
}

impl EconomyTuning {
    /// Loads tuning from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] if the file cannot be read
    /// or parsed, or a knob is out of range.
    pub fn from_toml(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Parses tuning from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] on parse failure or an
    /// out-of-range knob.
    pub fn from_toml_str(text: &str) -> EconomyResult<Self> {
        let tuning: Self =
            toml::from_str(text).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> EconomyResult<()> {
        if !(self.soft_cap_compression > 0.0 && self.soft_cap_compression <= 1.0) {
            return Err(EconomyError::InvalidConfig(
                "soft_cap_compression must be in (0, 1]".to_string(),
            ));
        }
        if !(self.synergy_max_bonus >= 0.0 && self.synergy_max_bonus < 0.1) {
            return Err(EconomyError::InvalidConfig(
                "synergy_max_bonus must be in [0, 0.1)".to_string(),
            ));
        }
        if !(self.diminishing_power > 0.0 && self.diminishing_power <= 1.0) {
            return Err(EconomyError::InvalidConfig(
                "diminishing_power must be in (0, 1]".to_string(),
            ));
        }
        if self.pow_cache_capacity == 0 {
            return Err(EconomyError::InvalidConfig(
                "pow_cache_capacity must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EconomyTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let tuning = EconomyTuning::from_toml_str("synergy_threshold = 50.0\n").unwrap();
        assert!((tuning.synergy_threshold - 50.0).abs() < f64::EPSILON);
        assert_eq!(tuning.max_cost_exponent, 1_000_000);
    }

    #[test]
    fn test_out_of_range_knob_rejected() {
        let result = EconomyTuning::from_toml_str("synergy_max_bonus = 0.5\n");
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_garbage_toml_rejected() {
        assert!(EconomyTuning::from_toml_str("not valid {{{").is_err());
    }
}
