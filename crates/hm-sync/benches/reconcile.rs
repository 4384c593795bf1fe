//! Benchmarks for reconciliation passes.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hm_core::{MetadataEntry, MetadataMap};
use hm_sync::{MemoryDocument, MetadataSync};

fn page(keys: usize, variant: usize) -> MetadataMap {
    let mut data = MetadataMap::new();
    data.insert("title".to_owned(), format!("Page {variant}"));
    data.insert("description".to_owned(), format!("Description {variant}"));
    for i in 0..keys {
        data.insert(format!("custom:key{i}"), format!("value {variant}/{i}"));
    }
    data
}

fn tags(count: usize) -> Vec<Vec<MetadataEntry>> {
    (0..count)
        .map(|i| vec![MetadataEntry::new("article:tag", format!("tag{i}"))])
        .collect()
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_state");
    for keys in [8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, &keys| {
            let mut sync = MetadataSync::new(MemoryDocument::new("https://bench.test"));
            let data = page(keys, 0);
            let entries = tags(4);
            let _ = sync.update(&data, Some(entries.as_slice()));
            b.iter(|| black_box(sync.update(black_box(&data), Some(entries.as_slice()))));
        });
    }
    group.finish();
}

fn bench_alternating_pages(c: &mut Criterion) {
    c.bench_function("alternating_pages", |b| {
        let mut sync = MetadataSync::new(MemoryDocument::new("https://bench.test"));
        let pages = [page(16, 0), page(4, 1)];
        let entries = [tags(6), tags(1)];
        let mut turn = 0;
        b.iter(|| {
            turn ^= 1;
            black_box(sync.update(&pages[turn], Some(entries[turn].as_slice())))
        });
    });
}

criterion_group!(benches, bench_steady_state, bench_alternating_pages);
criterion_main!(benches);
