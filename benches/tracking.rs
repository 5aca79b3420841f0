//! Criterion benchmarks for tracking runs and grid search.
//!
//! Run with: cargo bench
//! Run specific group: cargo bench -- search
//! Sequential grid search: cargo bench --no-default-features -- search

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use gated_kalman::{
    simulate, HyperparameterSearch, MotionModel, RunConfig, ScenarioConfig, SimpleRng,
    TrackingInput, TrackingRun,
};

const SEQUENCE_LENGTHS: [usize; 3] = [100, 1_000, 10_000];

fn scenario(num_steps: usize) -> TrackingInput {
    let config = ScenarioConfig {
        num_steps,
        acceleration_std: 0.05,
        measurement_std: 0.5,
        outlier_probability: 0.02,
        ..ScenarioConfig::default()
    };
    simulate(&config, &mut SimpleRng::new(42)).unwrap()
}

// =============================================================================
// Single run
// =============================================================================

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.measurement_time(Duration::from_secs(5));

    let model = MotionModel::from_scales(0.01, 0.25, 1.0).unwrap();
    let tracker = TrackingRun::new(model, RunConfig::default()).unwrap();

    for n in SEQUENCE_LENGTHS {
        let input = scenario(n);
        group.bench_with_input(BenchmarkId::new("steps", n), &input, |b, input| {
            b.iter(|| tracker.run(black_box(input)).unwrap())
        });
    }

    group.finish();
}

// =============================================================================
// Grid search
// =============================================================================

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let search = HyperparameterSearch::new(
        vec![1e-3, 1e-2, 1e-1, 1.0, 10.0],
        vec![1e-2, 1e-1, 1.0, 10.0, 100.0],
        1.0,
        RunConfig::default(),
    )
    .unwrap();

    for n in [100, 1_000] {
        let input = scenario(n);
        group.bench_with_input(BenchmarkId::new("grid_5x5", n), &input, |b, input| {
            b.iter(|| search.run(black_box(input)).unwrap())
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(tracking_benches, bench_run, bench_search);

criterion_main!(tracking_benches);
