//! # Save Migration
//!
//! Older save records store numbers in whatever shape the writer of the
//! day used: raw JSON numbers, decimal strings, scientific-notation
//! strings from a big-number library, or the literal `"NaN"` / `"Infinity"`
//! a corrupted serializer leaked. Hydration folds all of those into
//! [`NumValue`]; dehydration writes the canonical form back out (a plain
//! JSON number when the value fits the safe float range, a scientific
//! string otherwise).
//!
//! Non-numeric fields are never touched: migration normalizes magnitudes,
//! it does not interpret the record.

use serde_json::Value;

use fizzcore_numeric::NumValue;

use crate::purchase::{ResourceCounters, SanitizeReport};
use crate::tuning::EconomyTuning;

/// Reads one save field as a numeric value.
///
/// JSON numbers and parseable numeric strings hydrate; the corruption
/// sentinels `"NaN"`, `"Infinity"` and `"-Infinity"` hydrate to zero.
/// Anything else returns `None` so the caller can pass it through.
#[must_use]
pub fn hydrate_value(field: &Value) -> Option<NumValue> {
    match field {
        Value::Number(n) => n.as_f64().map(NumValue::coerce_f64),
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed {
                "NaN" | "Infinity" | "-Infinity" => Some(NumValue::ZERO),
                _ => trimmed.parse().ok(),
            }
        }
        _ => None,
    }
}

/// Writes a value in canonical save form: a JSON number while it fits the
/// safe float range, a full-precision scientific string beyond it.
#[must_use]
pub fn dehydrate_value(value: NumValue) -> Value {
    match value {
        NumValue::Plain(v) => serde_json::Number::from_f64(v)
            .map_or_else(|| Value::String(value.promote().to_string()), Value::Number),
        NumValue::Big(big) => Value::String(big.to_string()),
    }
}

/// Migrates a flat save record to canonical numeric form.
///
/// Every field that hydrates as a number is rewritten via
/// [`dehydrate_value`]; everything else (names, flags, nested structures)
/// passes through unchanged. Non-object input is returned as-is.
#[must_use]
pub fn migrate_record(record: Value) -> Value {
    let Value::Object(map) = record else {
        return record;
    };
    let migrated = map
        .into_iter()
        .map(|(key, field)| match hydrate_value(&field) {
            Some(num) => (key, dehydrate_value(num)),
            None => (key, field),
        })
        .collect();
    Value::Object(migrated)
}

/// Hydrates resource counters from a save record.
///
/// Missing or non-numeric fields default to zero; the result is then
/// sanitized, so a corrupted save yields playable counters plus a report
/// of what was replaced.
#[must_use]
pub fn counters_from_record(
    tuning: &EconomyTuning,
    record: &Value,
) -> (ResourceCounters, SanitizeReport) {
    let field = |name: &str| {
        record
            .get(name)
            .and_then(hydrate_value)
            .unwrap_or(NumValue::ZERO)
    };
    let mut counters = ResourceCounters {
        straws: field("straws"),
        cups: field("cups"),
        suctions: field("suctions"),
        wider_straws: field("wider_straws"),
        better_cups: field("better_cups"),
        faster_drinks: field("faster_drinks"),
        critical_clicks: field("critical_clicks"),
        level: field("level"),
        sips: field("sips"),
        total_sips_earned: field("total_sips_earned"),
    };
    let report = counters.sanitize(tuning);
    (counters, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hydrate_accepts_every_legacy_shape() {
        assert_eq!(hydrate_value(&json!(42.5)), Some(NumValue::coerce_f64(42.5)));
        assert_eq!(hydrate_value(&json!("1234")), Some(NumValue::coerce_f64(1234.0)));
        assert_eq!(
            hydrate_value(&json!("2.5e80")),
            Some(NumValue::coerce_str("2.5e80"))
        );
        assert_eq!(hydrate_value(&json!("NaN")), Some(NumValue::ZERO));
        assert_eq!(hydrate_value(&json!("-Infinity")), Some(NumValue::ZERO));
        assert_eq!(hydrate_value(&json!("soda")), None);
        assert_eq!(hydrate_value(&json!(true)), None);
        assert_eq!(hydrate_value(&Value::Null), None);
    }

    #[test]
    fn test_dehydrate_picks_number_or_string_by_magnitude() {
        assert_eq!(dehydrate_value(NumValue::coerce_f64(12.0)), json!(12.0));
        assert_eq!(
            dehydrate_value(NumValue::coerce_str("1.5e300")),
            json!("1.5e300")
        );
    }

    #[test]
    fn test_migrate_record_normalizes_numbers_only() {
        let record = json!({
            "sips": "1.5e300",
            "straws": 12,
            "cups": "  40  ",
            "level": "Infinity",
            "player_name": "fizzy",
            "options": { "sound": true },
        });
        let migrated = migrate_record(record);
        assert_eq!(migrated["sips"], json!("1.5e300"));
        assert_eq!(migrated["straws"], json!(12.0));
        assert_eq!(migrated["cups"], json!(40.0));
        assert_eq!(migrated["level"], json!(0.0));
        assert_eq!(migrated["player_name"], json!("fizzy"));
        assert_eq!(migrated["options"], json!({ "sound": true }));
    }

    #[test]
    fn test_round_trip_preserves_value() {
        for input in ["0", "7", "123456.75", "9.99e14", "1e15", "3.25e7500"] {
            let value = NumValue::coerce_str(input);
            let hydrated = hydrate_value(&dehydrate_value(value)).unwrap();
            assert_eq!(hydrated, value, "input {input}");
        }
    }

    #[test]
    fn test_counters_from_corrupt_record_are_playable() {
        let tuning = EconomyTuning::default();
        let record = json!({
            "straws": "NaN",
            "cups": 3,
            "sips": "1e250",
        });
        let (counters, report) = counters_from_record(&tuning, &record);
        assert_eq!(counters.cups, NumValue::coerce_f64(3.0));
        // "NaN" hydrated to zero, which is valid; the oversized balance was
        // substituted
        assert!(counters.straws.is_zero());
        assert_eq!(counters.sips, NumValue::coerce_f64(tuning.resource_fallback));
        assert_eq!(report.substitutions.len(), 1);
        // Missing fields default to zero
        assert!(counters.level.is_zero());
    }
}
