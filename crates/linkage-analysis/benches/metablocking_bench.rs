//! Meta-blocking benchmarks: candidate graph weighting and every pruning
//! strategy over synthetic dirty block collections.
//!
//! Run with: cargo bench -p linkage-analysis --bench metablocking_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linkage_analysis::index::EntityIndex;
use linkage_analysis::registry::build_pruner;
use linkage_analysis::weighting::CandidateGraph;
use linkage_core::config::MetablockingConfig;
use linkage_core::types::{Block, PruningMethod, WeightingScheme};

/// `entities` records spread over blocks of 2 to 9 members by a fixed
/// linear congruential sequence, so every run sees the same input.
fn synthetic_blocks(entities: u32) -> Vec<Block> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: u32| {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        ((state >> 33) % bound as u64) as u32
    };
    (0..entities / 2)
        .map(|_| {
            let size = 2 + next(8);
            Block::unilateral((0..size).map(|_| next(entities)))
        })
        .collect()
}

fn weighting(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighting");
    group.sample_size(10);

    let blocks = synthetic_blocks(20_000);
    let index = EntityIndex::build(&blocks, false).unwrap();
    for &scheme in WeightingScheme::ALL {
        group.bench_with_input(BenchmarkId::new("candidate_graph", scheme), &scheme, |b, &s| {
            b.iter(|| CandidateGraph::build(&index, &blocks, s));
        });
    }
    group.finish();
}

fn pruning(c: &mut Criterion) {
    let mut group = c.benchmark_group("pruning");
    group.sample_size(10);

    for size in [5_000u32, 20_000] {
        let blocks = synthetic_blocks(size);
        for &method in PruningMethod::ALL {
            let pruner = build_pruner(&MetablockingConfig {
                method: Some(method),
                ..Default::default()
            });
            group.bench_with_input(
                BenchmarkId::new(method.name(), size),
                &blocks,
                |b, blocks| {
                    b.iter(|| pruner.prune(blocks, false).unwrap());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, weighting, pruning);
criterion_main!(benches);
