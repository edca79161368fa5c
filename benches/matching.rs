//! Benchmarks for the matchbook matching engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- single_match
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};

use matchbook::engine::MatchingEngine;
use matchbook::settlement::{Asset, MemorySettlement};
use matchbook::types::price::SCALE;
use matchbook::types::{Side, TimeInForce};

const GTC: TimeInForce = TimeInForce::GoodTillCancel;

// ============================================================================
// HELPER FUNCTIONS - Deterministic book setup
// ============================================================================

/// Engine whose owners `1..=owners` can afford every benchmark order
fn funded_engine(owners: u64, capacity: usize) -> MatchingEngine<MemorySettlement> {
    let mut settlement = MemorySettlement::new();
    for owner in 1..=owners {
        settlement.deposit(owner, Asset::Base, u64::MAX / 4);
        settlement.deposit(owner, Asset::Quote, u64::MAX / 4);
    }
    MatchingEngine::with_capacity(settlement, capacity)
}

/// Rest `count` asks starting at `base_price`, one price level apart.
fn populate_asks(engine: &mut MatchingEngine<MemorySettlement>, count: usize, base_price: u64) {
    for i in 0..count {
        let price = base_price + (i as u64 * SCALE);
        engine
            .place_order(1, Side::Sell, price, SCALE, GTC, i as u64)
            .expect("ask rests");
    }
}

/// Rest `count` bids starting at `base_price`, one price level apart, downward.
fn populate_bids(engine: &mut MatchingEngine<MemorySettlement>, count: usize, base_price: u64) {
    for i in 0..count {
        let price = base_price - (i as u64 * SCALE);
        engine
            .place_order(1, Side::Buy, price, SCALE, GTC, i as u64)
            .expect("bid rests");
    }
}

/// Deterministic pseudo-random order stream: same seed, same stream.
fn order_stream(count: usize, seed: u64) -> Vec<(u64, Side, u64, u64)> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let owner = rng.gen_range(2..=8);
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price = (50 + rng.gen_range(0..10)) * SCALE;
            let quantity = rng.gen_range(SCALE / 100..=SCALE);
            (owner, side, price, quantity)
        })
        .collect()
}

// ============================================================================
// BENCHMARKS
// ============================================================================

/// Resting placement: no crossing liquidity, pure book insert.
fn bench_place_resting(c: &mut Criterion) {
    c.bench_function("place_resting", |b| {
        b.iter_batched(
            || funded_engine(2, 1_024),
            |mut engine| {
                engine
                    .place_order(2, Side::Buy, black_box(50 * SCALE), SCALE, GTC, 0)
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

/// One full fill against the best ask of a populated book.
fn bench_single_match(c: &mut Criterion) {
    c.bench_function("single_match", |b| {
        b.iter_batched(
            || {
                let mut engine = funded_engine(2, 1_024);
                populate_asks(&mut engine, 100, 50 * SCALE);
                engine
            },
            |mut engine| {
                engine
                    .place_order(2, Side::Buy, black_box(50 * SCALE), SCALE, GTC, 1_000)
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

/// Market order sweeping multiple price levels.
fn bench_sweep_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_levels");
    for depth in [1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_batched(
                || {
                    let mut engine = funded_engine(2, 1_024);
                    populate_bids(&mut engine, 100, 200 * SCALE);
                    engine
                },
                |mut engine| {
                    engine
                        .place_market_order(2, Side::Sell, depth as u64 * SCALE, 1_000)
                        .unwrap()
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Mixed flow throughput over a seeded order stream.
fn bench_mixed_flow(c: &mut Criterion) {
    const COUNT: usize = 10_000;
    let orders = order_stream(COUNT, 42);

    let mut group = c.benchmark_group("mixed_flow");
    group.throughput(Throughput::Elements(COUNT as u64));
    group.bench_function("limit_orders", |b| {
        b.iter_batched(
            || (funded_engine(8, COUNT * 2), orders.clone()),
            |(mut engine, orders)| {
                for (i, (owner, side, price, quantity)) in orders.into_iter().enumerate() {
                    engine
                        .place_order(owner, side, price, quantity, GTC, i as u64)
                        .unwrap();
                }
                engine
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_place_resting,
    bench_single_match,
    bench_sweep_levels,
    bench_mixed_flow
);
criterion_main!(benches);
