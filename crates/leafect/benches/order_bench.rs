//! Criterion benchmarks for 2-NN graph construction and contour ordering.
//! Sizes: outline points in {100, 400, 1600}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use leafect::prelude::*;

fn cloud(points: usize, index: u64) -> Vec<Vec2<f64>> {
    let cfg = OutlineCfg {
        points,
        ..OutlineCfg::default()
    };
    sample_outline(cfg, ReplayToken { seed: 11, index })
}

fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("order");
    for &n in &[100usize, 400, 1600] {
        group.bench_with_input(BenchmarkId::new("neighbor_graph", n), &n, |b, &n| {
            b.iter_batched(
                || cloud(n, 1),
                |pts| nearest_neighbor_graph(&pts, NeighborCfg::default()).unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("order_contour", n), &n, |b, &n| {
            b.iter_batched(
                || cloud(n, 2),
                |pts| order_contour(&pts, &OrderCfg::default()).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_order);
criterion_main!(benches);
