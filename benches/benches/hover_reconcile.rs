// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_file_drop::registry::HoverRegistry;

/// Builds a registry over a chain `depth -> depth-1 -> ... -> 0` where every
/// `stride`-th node is an attached target.
fn chain_registry(depth: u32, stride: u32) -> HoverRegistry<u32> {
    let mut registry = HoverRegistry::new(0);
    for node in (1..=depth).filter(|n| n % stride == 0) {
        let target = registry.next_target_id();
        registry.attach(target, node).unwrap();
    }
    registry
}

fn bench_enter_leave_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_drop/enter_leave");

    // One pointer crossing: enter on the deepest node, leave on the same node.
    for depth in [4u32, 16, 64, 256] {
        let path: Vec<u32> = (0..=depth).rev().collect();
        group.throughput(Throughput::Elements(path.len() as u64));

        for stride in [1u32, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("path/stride{stride}"), depth),
                &path,
                |b, path| {
                    let mut registry = chain_registry(depth, stride);
                    b.iter(|| {
                        black_box(registry.drag_enter(path.iter().copied()));
                        black_box(registry.drag_leave(path.iter().copied()));
                    });
                },
            );
        }

        group.bench_with_input(BenchmarkId::new("lookup", depth), &depth, |b, &depth| {
            let parent = |n: &u32| n.checked_sub(1);
            let mut registry = chain_registry(depth, 4);
            b.iter(|| {
                black_box(registry.drag_enter_at(depth, &parent));
                black_box(registry.drag_leave_at(depth, &parent));
            });
        });
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_drop/cancel");

    for targets in [8u32, 64, 512] {
        group.throughput(Throughput::Elements(u64::from(targets)));
        group.bench_with_input(
            BenchmarkId::new("all_hovered", targets),
            &targets,
            |b, &targets| {
                b.iter_batched(
                    || {
                        let mut registry = chain_registry(targets, 1);
                        registry.drag_enter((0..=targets).rev());
                        registry
                    },
                    |mut registry| black_box(registry.cancel()),
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_enter_leave_pair, bench_cancel);
criterion_main!(benches);
