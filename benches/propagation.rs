//! Propagation benchmarks
//!
//! Compares the four strategies on seeded random graphs with a few long
//! chains, so that runs take a realistic number of passes.

use std::hint::black_box;
use std::sync::Arc;

use ccprop::{CCConfig, CCController, CSRGraph, StrategyKind, CC};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random sparse graph plus a chain through every 64th vertex.
fn generate_graph(vertex_count: usize, edges_per_vertex: usize) -> CSRGraph {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let n = vertex_count as u32;
    let mut edges = Vec::with_capacity(vertex_count * edges_per_vertex);
    for src in 0..n {
        for _ in 0..edges_per_vertex {
            // Local edges keep the diameter large.
            let dst = (src + rng.gen_range(1..=16)).min(n - 1);
            edges.push((src, dst));
        }
    }
    for src in (0..n.saturating_sub(64)).step_by(64) {
        edges.push((src, src + 64));
    }
    CSRGraph::from_edges(vertex_count, &edges).unwrap_or_default()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");
    group.sample_size(10);

    for vertex_count in [10_000usize, 100_000] {
        let controller = CCController::new(Arc::new(generate_graph(vertex_count, 2)));
        for strategy in StrategyKind::ALL {
            let config = CCConfig {
                strategy,
                thread_num: Some(4),
            };
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), vertex_count),
                &config,
                |b, config| {
                    b.iter(|| black_box(controller.count_cc(config)).ok());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
