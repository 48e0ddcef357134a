//! # Memoization Layer
//!
//! Bounded caches for the exponentiation the cost curves hammer every
//! frame. Strictly a latency optimization: dropping or clearing a cache can
//! never change a result, only how fast it arrives.

use std::collections::HashMap;
use std::hash::Hash;

use fizzcore_numeric::NumValue;

/// Counters exposed for diagnostics overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that fell through to a fresh computation.
    pub misses: u64,
    /// Entries evicted to make room.
    pub evictions: u64,
    /// Current entry count.
    pub entries: usize,
}

/// Bounded key-value cache with least-recently-used eviction.
///
/// Eviction scans for the oldest touch stamp; capacities here are a few
/// hundred entries, where the linear scan is cheaper than maintaining an
/// intrusive recency list.
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: HashMap<K, Slot<V>>,
    capacity: usize,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

#[derive(Debug)]
struct Slot<V> {
    value: V,
    touched: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// Creates a cache bounded to `capacity` entries (minimum one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            clock: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Looks up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.clock += 1;
        let clock = self.clock;
        match self.map.get_mut(key) {
            Some(slot) => {
                slot.touched = clock;
                self.hits += 1;
                Some(slot.value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a value, evicting the least-recently-touched entry if full.
    pub fn insert(&mut self, key: K, value: V) {
        self.clock += 1;
        if !self.map.contains_key(&key) && self.map.len() >= self.capacity {
            if let Some(oldest) = self
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.touched)
                .map(|(k, _)| k.clone())
            {
                self.map.remove(&oldest);
                self.evictions += 1;
            }
        }
        let clock = self.clock;
        self.map.insert(key, Slot { value, touched: clock });
    }

    /// Drops every entry. Outputs of memoized functions are unaffected.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Current entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no entries are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Diagnostic counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.map.len(),
        }
    }
}

/// Cache key for a pow computation: the stringified operand pair. The raw
/// debug form is exact (no display rounding), so distinct operands never
/// collide.
#[must_use]
pub(crate) fn pow_key(base: NumValue, exp: NumValue) -> String {
    format!("{base:?}^{exp:?}")
}

/// Uncached exponentiation with the integer fast path: non-negative whole
/// exponents use binary exponentiation (`O(log n)` multiplies), everything
/// else goes through log-space pow.
#[must_use]
pub fn raw_pow(base: NumValue, exp: NumValue) -> NumValue {
    match exp {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        NumValue::Plain(e) if e >= 0.0 && e.fract() == 0.0 => base.powi(e as u64),
        _ => base.pow(exp),
    }
}

/// Compound growth over `ticks` cycles: `base * rate^ticks`.
///
/// Below `binary_threshold` ticks this multiplies naively; above it,
/// binary exponentiation computes the same mathematical result in
/// `O(log ticks)` multiplies.
#[must_use]
pub fn compound_growth(
    base: NumValue,
    rate: NumValue,
    ticks: u64,
    binary_threshold: u64,
) -> NumValue {
    let factor = if ticks >= binary_threshold {
        rate.powi(ticks)
    } else {
        let mut acc = NumValue::ONE;
        for _ in 0..ticks {
            acc = acc.mul(rate);
        }
        acc
    };
    base.mul(factor)
}
