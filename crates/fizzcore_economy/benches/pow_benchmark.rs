//! Benchmark for memoized exponentiation and the cost curve.
//!
//! Run with: cargo bench --package fizzcore_economy --bench pow_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fizzcore_economy::cache::{compound_growth, raw_pow};
use fizzcore_economy::EconomyEngine;
use fizzcore_numeric::NumValue;

fn benchmark_raw_vs_memoized_pow(c: &mut Criterion) {
    let base = NumValue::coerce_f64(1.08);
    let exp = NumValue::from(500u32);

    c.bench_function("raw_pow_1.08^500", |b| {
        b.iter(|| black_box(raw_pow(black_box(base), black_box(exp))));
    });

    let engine = EconomyEngine::default();
    c.bench_function("memoized_pow_1.08^500_warm", |b| {
        // Warm the single entry, then measure the hit path
        let _ = engine.memoized_pow(base, exp);
        b.iter(|| black_box(engine.memoized_pow(black_box(base), black_box(exp))));
    });
}

fn benchmark_cost_curve(c: &mut Criterion) {
    let engine = EconomyEngine::default();
    let base_cost = NumValue::coerce_f64(5.0);
    let scaling = NumValue::coerce_f64(1.08);

    // Cycle over a realistic set of owned-counts so the cache sees the
    // same keys a running game would
    c.bench_function("purchase_cost_cycling_owned", |b| {
        let mut owned = 0u32;
        b.iter(|| {
            owned = (owned + 1) % 64;
            black_box(engine.purchase_cost(NumValue::from(owned), base_cost, scaling))
        });
    });
}

fn benchmark_compound_growth_paths(c: &mut Criterion) {
    let base = NumValue::ONE;
    let rate = NumValue::coerce_f64(1.01);

    c.bench_function("compound_growth_naive_500_ticks", |b| {
        b.iter(|| black_box(compound_growth(base, rate, black_box(500), 1000)));
    });

    c.bench_function("compound_growth_binary_1e6_ticks", |b| {
        b.iter(|| black_box(compound_growth(base, rate, black_box(1_000_000), 1000)));
    });
}

criterion_group!(
    benches,
    benchmark_raw_vs_memoized_pow,
    benchmark_cost_curve,
    benchmark_compound_growth_paths
);
criterion_main!(benches);
