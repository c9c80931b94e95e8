//! Criterion benchmarks for the Schelling simulation engine.
//!
//! Two groups:
//! - `step`: per-step cost of the pairwise-swap rule on mid-sized rings
//! - `happiness`: full happiness-vector evaluation cost

use criterion::{Criterion, criterion_group, criterion_main};
use schelling_core::engine::Simulation;
use schelling_core::fixed::f64_to_fixed64;
use schelling_core::topology::Topology;

/// A mixed (non-absorbing) population: every third agent is one type.
fn build_ring(size: usize, mistake_probability: f64, seed: u64) -> Simulation {
    let labels = (0..size).map(|i| i % 3 == 0).collect();
    Simulation::new(
        labels,
        Topology::Ring,
        f64_to_fixed64(mistake_probability),
        seed,
    )
    .expect("benchmark population is valid")
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.sample_size(50);

    let mut small = build_ring(64, 0.1, 42);
    group.bench_function("ring_64_p_0_1", |b| {
        b.iter(|| {
            small.step();
        });
    });

    let mut large = build_ring(1024, 0.1, 42);
    group.bench_function("ring_1024_p_0_1", |b| {
        b.iter(|| {
            large.step();
        });
    });

    group.finish();
}

fn bench_happiness(c: &mut Criterion) {
    let mut group = c.benchmark_group("happiness");
    group.sample_size(50);

    let sim = build_ring(1024, 0.0, 7);
    group.bench_function("vector_ring_1024", |b| {
        b.iter(|| sim.happiness_vector());
    });
    group.bench_function("absorbing_ring_1024", |b| {
        b.iter(|| sim.is_absorbing());
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_happiness);
criterion_main!(benches);
