//! Criterion benchmarks for the Food Court simulation engine.
//!
//! Two benchmark groups:
//! - `orders`: full per-order runs of the reference fixtures
//! - `validation`: structural checks alone

use criterion::{Criterion, criterion_group, criterion_main};
use foodcourt_core::engine::{SimConfig, Simulator};
use foodcourt_core::test_utils::*;
use std::hint::black_box;

fn bench_orders(c: &mut Criterion) {
    let sim = Simulator::new(two_twelve_level(), SimConfig::default()).unwrap();
    let solution = two_twelve_solution(true);
    let ring = ring_solution();

    let mut group = c.benchmark_group("orders");
    group.bench_function("two_twelve_success", |b| {
        b.iter(|| black_box(sim.simulate_order(black_box(&solution), 0)))
    });
    group.bench_function("ring_until_loop", |b| {
        b.iter(|| black_box(sim.simulate_order(black_box(&ring), 0)))
    });
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let sim = Simulator::new(two_twelve_level(), SimConfig::default()).unwrap();
    let solution = two_twelve_solution(true);
    c.benchmark_group("validation")
        .bench_function("two_twelve", |b| b.iter(|| black_box(sim.validate(black_box(&solution)))));
}

criterion_group!(benches, bench_orders, bench_validation);
criterion_main!(benches);
