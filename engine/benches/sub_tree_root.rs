//! Benchmarks the hash-call savings `sub_tree_root` buys over a naive
//! full-width pairwise reduction, across a spread of sub-tree depths and
//! fill ratios.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use merkle_rollup_engine::{sub_tree_root, Node};
use merkle_rollup_hashers::Keccak256Hasher;

fn leaves_of(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let mut n = [0u8; 32];
            n[24..].copy_from_slice(&(i as u64).to_be_bytes());
            n
        })
        .collect()
}

fn bench_sub_tree_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("sub_tree_root");
    for depth in [4u32, 8, 12] {
        let capacity = 1usize << depth;
        let hasher = Keccak256Hasher::new(depth as usize);
        for fill_ratio in [1, 4, 16] {
            let count = (capacity / fill_ratio).max(1);
            let leaves = leaves_of(count);
            group.bench_with_input(
                BenchmarkId::new(format!("depth={depth}"), format!("filled={count}/{capacity}")),
                &leaves,
                |b, leaves| {
                    b.iter(|| sub_tree_root(&hasher, depth, black_box(leaves)).unwrap());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sub_tree_root);
criterion_main!(benches);
