//! Criterion benchmarks for initial-condition projection and residual
//! assembly through a full problem.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessel_bench::{reference_profile, stress_profile, LumpedMass};
use tessel_core::VariableId;
use tessel_engine::{FeProblem, ParallelConfig};

const U: VariableId = VariableId(0);

fn bench_project_10k(c: &mut Criterion) {
    let mut problem = FeProblem::new(reference_profile(42, ParallelConfig::default())).unwrap();

    c.bench_function("project_ics_10k", |b| {
        b.iter(|| {
            let written = problem.project_initial_conditions().unwrap();
            black_box(written);
        });
    });
}

fn bench_residual_10k(c: &mut Criterion) {
    let mut problem = FeProblem::new(reference_profile(42, ParallelConfig::default())).unwrap();
    problem.project_initial_conditions().unwrap();
    let kernel = LumpedMass { variable: U };

    c.bench_function("residual_10k", |b| {
        b.iter(|| {
            let r = problem.compute_residual(&kernel).unwrap();
            black_box(&r);
        });
    });
}

fn bench_residual_100k(c: &mut Criterion) {
    let mut problem = FeProblem::new(stress_profile(42, ParallelConfig::default())).unwrap();
    problem.project_initial_conditions().unwrap();
    let kernel = LumpedMass { variable: U };

    c.bench_function("residual_100k", |b| {
        b.iter(|| {
            let r = problem.compute_residual(&kernel).unwrap();
            black_box(&r);
        });
    });
}

criterion_group!(
    benches,
    bench_project_10k,
    bench_residual_10k,
    bench_residual_100k
);
criterion_main!(benches);
