//! Benchmarks for the CLT solver

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use clt_solver::prelude::*;

fn carbon() -> Arc<Material> {
    Arc::new(Material::carbon_epoxy())
}

fn twenty_ply_stack() -> Vec<f64> {
    let mut stack = Vec::new();
    for _ in 0..5 {
        stack.extend_from_slice(&[0.0, 45.0, -45.0, 90.0]);
    }
    stack
}

fn bench_laminate_assembly(c: &mut Criterion) {
    let material = carbon();
    let stack = twenty_ply_stack();

    c.bench_function("laminate_assembly_20_plies", |b| {
        b.iter(|| {
            Laminate::with_default_thickness(Arc::clone(&material), black_box(&stack), false)
                .unwrap()
        })
    });
}

fn bench_polar_sweep(c: &mut Criterion) {
    let laminate =
        Laminate::with_default_thickness(carbon(), &twenty_ply_stack(), false).unwrap();

    c.bench_function("polar_sweep_5_deg", |b| {
        b.iter(|| laminate.polar_stiffness(black_box(5.0)).unwrap())
    });
}

fn bench_failure_envelope(c: &mut Criterion) {
    let laminate =
        Laminate::with_default_thickness(carbon(), &twenty_ply_stack(), false).unwrap();
    let limits = StrengthLimits::new(1500e6, 1200e6, 50e6, 250e6, Some(70e6)).unwrap();

    c.bench_function("tsai_wu_envelope_72_points", |b| {
        b.iter(|| {
            FailureCriterion::TsaiWu.envelope(
                black_box(&laminate),
                &limits,
                DEFAULT_ENVELOPE_POINTS,
            )
        })
    });
}

fn bench_safety_factor(c: &mut Criterion) {
    let laminate =
        Laminate::with_default_thickness(carbon(), &twenty_ply_stack(), false).unwrap();
    let limits = StrengthLimits::new(1500e6, 1200e6, 50e6, 250e6, Some(70e6)).unwrap();
    let load = InPlaneLoad::new(100_000.0, 50_000.0, 10_000.0);

    c.bench_function("tsai_wu_safety_factor", |b| {
        b.iter(|| safety_factor(black_box(&laminate), &load, &limits))
    });
}

fn bench_genetic_search(c: &mut Criterion) {
    let limits = StrengthLimits::new(1500e6, 1200e6, 50e6, 250e6, Some(70e6)).unwrap();
    let constraints = DesignConstraints {
        strength: Some(StrengthConstraint {
            safety_factor: 1.5,
            limits,
        }),
        buckling: None,
    };
    let ga = GeneticAlgorithm::new(
        carbon(),
        InPlaneLoad::new(10_000.0, 0.0, 0.0),
        constraints,
    )
    .with_population_size(10)
    .with_generations(5);

    c.bench_function("genetic_search_small", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            ga.optimize(&mut rng, 4, 8)
        })
    });
}

criterion_group!(
    benches,
    bench_laminate_assembly,
    bench_polar_sweep,
    bench_failure_envelope,
    bench_safety_factor,
    bench_genetic_search
);
criterion_main!(benches);
