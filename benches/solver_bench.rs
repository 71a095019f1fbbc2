//! Benchmarks for instance preprocessing and a short end-to-end solve.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use vrpldtt_alns::alns::{AlnsSolver, Parameters};
use vrpldtt_alns::problem::{BucketLayout, Instance};
use vrpldtt_alns::utils::create_seeded_rng;

/// Customers on a ring around the depot, mild elevation changes.
fn ring_topology(nr_customers: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let nr_nodes = nr_customers + 1;
    let position = |node: usize| -> (f64, f64) {
        if node == 0 {
            (0.0, 0.0)
        } else {
            let angle = 2.0 * std::f64::consts::PI * node as f64 / nr_customers as f64;
            (3.0 * angle.cos(), 3.0 * angle.sin())
        }
    };

    let mut distance = vec![vec![0.0; nr_nodes]; nr_nodes];
    let mut elevation = vec![vec![0.0; nr_nodes]; nr_nodes];
    for i in 0..nr_nodes {
        for j in 0..nr_nodes {
            let (xi, yi) = position(i);
            let (xj, yj) = position(j);
            distance[i][j] = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
            elevation[i][j] = 5.0 * (j as f64 - i as f64);
        }
    }
    (distance, elevation)
}

fn build_vrpldtt(nr_customers: usize) -> Instance {
    let (distance, elevation) = ring_topology(nr_customers);
    let demand: Vec<f64> = (0..nr_customers).map(|c| 10.0 + (c % 5) as f64 * 8.0).collect();
    let start_window: Vec<f64> = (0..nr_customers).map(|c| (c % 8) as f64 * 30.0).collect();
    let end_window: Vec<f64> = start_window.iter().map(|s| s + 360.0).collect();
    Instance::vrpldtt(
        (nr_customers / 4).max(2),
        nr_customers,
        demand,
        vec![4.0; nr_customers],
        start_window,
        end_window,
        elevation,
        distance,
        BucketLayout::Count(4),
        140.0,
        150.0,
    )
    .unwrap()
}

fn benchmark_preprocessing(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocessing");
    group.sample_size(10);

    for size in [10, 25] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| build_vrpldtt(size));
        });
    }

    group.finish();
}

fn benchmark_short_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("short_solve");
    group.sample_size(10);

    for size in [10, 25] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let instance = build_vrpldtt(size);
            let params = Parameters::new()
                .with_destroy_operators(["random_destroy", "shaw_destroy", "worst_destroy"])
                .with_repair_operators(["basic_greedy", "2_regret"])
                .with_max_time(5)
                .with_max_iterations(100);

            b.iter(|| {
                let solver = AlnsSolver::new(&instance, params.clone()).unwrap();
                let mut rng = create_seeded_rng(42);
                solver.solve(&mut rng).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_preprocessing, benchmark_short_solve);
criterion_main!(benches);
