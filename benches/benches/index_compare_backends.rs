// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use widgetstore_index::{Aabb2D, Index};

fn gen_grid_rects_i64(n: usize, cell: i64) -> Vec<Aabb2D<i64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i64 * cell;
            let y0 = y as i64 * cell;
            out.push(Aabb2D::<i64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, bound: i64) -> i64 {
        (self.next_u64() % bound as u64) as i64
    }
}

/// Widget-like boxes of mixed sizes scattered over a canvas.
fn gen_random_widgets(count: usize, canvas: i64) -> Vec<Aabb2D<i64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let w = 8 + rng.below(120);
        let h = 8 + rng.below(80);
        let x0 = rng.below(canvas - w);
        let y0 = rng.below(canvas - h);
        out.push(Aabb2D::<i64>::from_xywh(x0, y0, w, h));
    }
    out
}

fn gen_clustered_widgets(n_clusters: usize, per_cluster: usize, spread: i64) -> Vec<Aabb2D<i64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.below(4000), rng.below(4000));
        for _ in 0..per_cluster {
            let dx = rng.below(spread) - spread / 2;
            let dy = rng.below(spread) - spread / 2;
            out.push(Aabb2D::<i64>::from_xywh(cx + dx, cy + dy, 12, 12));
        }
    }
    out
}

fn bench_contained_grid_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("contained_grid_i64");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects_i64(n, 10);
        let region = Aabb2D::<i64>::from_xywh(100, 100, 400, 400);
        group.throughput(Throughput::Elements((n * n) as u64));

        let mut flat = Index::<i64, u32>::new();
        let mut tree = Index::<i64, u32>::with_rtree();
        for (i, r) in rects.iter().copied().enumerate() {
            let _ = flat.insert(r, i as u32);
            let _ = tree.insert(r, i as u32);
        }
        group.bench_function(format!("flatvec_query_n{}", n), |b| {
            b.iter(|| black_box(flat.query_contained(region).len()));
        });
        group.bench_function(format!("rtree_query_n{}", n), |b| {
            b.iter(|| black_box(tree.query_contained(region).len()));
        });
    }
    group.finish();
}

fn bench_build_rtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_rtree");
    for &count in &[1_000usize, 10_000] {
        let rects = gen_random_widgets(count, 8000);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("random_i64_{}", count), |b| {
            b.iter_batched(
                Index::<i64, u32>::with_rtree,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_grid_rects(64, 10.0);
    group.bench_function("grid_f64_4096", |b| {
        b.iter_batched(
            Index::<f64, u32>::with_rtree,
            |mut idx| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let hits = idx
                    .query_contained(Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0))
                    .len();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_contained_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("contained_clustered_i64");
    let rects = gen_clustered_widgets(40, 200, 300);
    let mut flat = Index::<i64, u32>::new();
    let mut tree = Index::<i64, u32>::with_rtree();
    for (i, r) in rects.iter().copied().enumerate() {
        let _ = flat.insert(r, i as u32);
        let _ = tree.insert(r, i as u32);
    }
    let region = Aabb2D::<i64>::from_xywh(1000, 1000, 800, 800);
    group.bench_function("flatvec", |b| {
        b.iter(|| black_box(flat.query_contained(region).len()));
    });
    group.bench_function("rtree", |b| {
        b.iter(|| black_box(tree.query_contained(region).len()));
    });
    group.finish();
}

fn bench_update_heavy_rtree_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy_rtree_i64");
    let rects = gen_random_widgets(5_000, 8000);
    group.bench_function("move_10pct_then_query", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<i64, u32>::with_rtree();
                let keys: Vec<_> = rects
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| idx.insert(r, i as u32))
                    .collect();
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (j, k) in keys.iter().enumerate().step_by(10) {
                    let shift = (j % 97) as i64;
                    let _ = idx.update(*k, Aabb2D::<i64>::from_xywh(shift * 40, shift * 30, 20, 20));
                }
                let hits = idx
                    .query_contained(Aabb2D::<i64>::from_xywh(0, 0, 2000, 2000))
                    .len();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_contained_grid_i64,
    bench_build_rtree,
    bench_contained_clustered,
    bench_update_heavy_rtree_i64,
);
criterion_main!(benches);
