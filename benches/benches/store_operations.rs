// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use widgetstore::{
    ListRequest, Rectangle, SequentialIdGenerator, StoreConfig, SystemClock, WidgetStorage,
    WidgetStore,
};

type Store = WidgetStore<SequentialIdGenerator, SystemClock>;

fn filled_store(count: usize) -> Store {
    let store = WidgetStore::with_parts(
        StoreConfig::default(),
        SequentialIdGenerator::new("b"),
        SystemClock,
    );
    for i in 0..count as i64 {
        let r = Rectangle::new((i * 37) % 4000, (i * 53) % 3000, 20 + i % 50, 20 + i % 30);
        let _ = store.create(r, None);
    }
    store
}

fn bench_shift_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift_cascade");
    for &run in &[100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(run as u64));
        group.bench_function(format!("create_at_bottom_run{}", run), |b| {
            b.iter_batched(
                || filled_store(run),
                |store| {
                    let w = store.create(Rectangle::new(0, 0, 10, 10), Some(0));
                    black_box(w.is_ok());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");
    let store = filled_store(20_000);
    let region = Rectangle::new(500, 500, 1500, 1500);

    group.bench_function("first_page_limit50", |b| {
        b.iter(|| black_box(store.list(&ListRequest::new(50)).map(|p| p.items.len())));
    });
    group.bench_function("region_first_page_limit50", |b| {
        let request = ListRequest::new(50).with_region(region);
        b.iter(|| black_box(store.list(&request).map(|p| p.items.len())));
    });
    group.bench_function("region_walk_all_pages", |b| {
        b.iter(|| {
            let mut request = ListRequest::new(100).with_region(region);
            let mut total = 0;
            while let Ok(page) = store.list(&request) {
                total += page.items.len();
                match page.next_cursor {
                    Some(cursor) => request.cursor = Some(cursor),
                    None => break,
                }
            }
            black_box(total);
        });
    });
    group.finish();
}

fn bench_paging_with_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("paging_with_moves");
    group.bench_function("reconcile_after_100_moves", |b| {
        b.iter_batched(
            || {
                let store = filled_store(5_000);
                let cursor = store
                    .list(&ListRequest::new(2_500))
                    .ok()
                    .and_then(|p| p.next_cursor);
                for i in 0..100_i64 {
                    let id = format!("b-{}", 1 + (i * 47) % 5_000);
                    let _ = store.update(&id, Rectangle::new(0, 0, 10, 10), Some(i * 20));
                }
                (store, cursor)
            },
            |(store, cursor)| {
                let page = store.list(&ListRequest::new(100).after(cursor));
                black_box(page.map(|p| p.items.len()));
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_shift_cascade,
    bench_list,
    bench_paging_with_moves
);
criterion_main!(benches);
