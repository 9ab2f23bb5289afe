// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_file_drop::file::FileInfo;
use understory_file_drop::pattern::TypePattern;
use understory_file_drop::registry::HoverRegistry;
use understory_file_drop::target::{DropOptions, DropTarget};

const TYPES: [&str; 4] = ["image/png", "text/plain", "video/mp4", "image/jpeg"];

fn files(len: usize) -> Vec<FileInfo> {
    (0..len)
        .map(|i| FileInfo::new(format!("file{i}"), TYPES[i % TYPES.len()]))
        .collect()
}

fn bench_pattern_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_drop/pattern");
    let patterns = [
        ("any", "*/*"),
        ("wildcard", "image/*"),
        ("list", "image/png, image/jpeg, image/webp, video/mp4, audio/*"),
    ];
    for (name, source) in patterns {
        let pattern = TypePattern::parse(source).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                for mime in TYPES {
                    black_box(pattern.matches(black_box(mime)));
                }
            });
        });
    }
    group.finish();
}

fn bench_handle_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_drop/handle_drop");

    for len in [1usize, 16, 256] {
        let batch = files(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("multiple", len), &batch, |b, batch| {
            let registry = HoverRegistry::shared(0_u32);
            let options = DropOptions::default()
                .with_allow_multiple(true)
                .with_allowed_types(TypePattern::parse("image/*, video/*").unwrap());
            let mut target = DropTarget::<u32, FileInfo>::new(&registry, 1, options);
            target.attach().unwrap();
            b.iter_batched(
                || batch.clone(),
                |batch| black_box(target.handle_drop(batch, &mut ())),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pattern_matches, bench_handle_drop);
criterion_main!(benches);
