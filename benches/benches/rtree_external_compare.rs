// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use widgetstore_index::{Aabb2D, Index};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: i64) -> Vec<Aabb2D<i64>> {
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

fn to_rstar_rects(v: &[Aabb2D<i64>]) -> Vec<Rectangle<[i64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]))
        .collect()
}

fn bench_contained_external_compare_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("contained_external_compare_i64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10);
        let region = Aabb2D::<i64>::from_xywh(100, 100, 400, 400);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("widgetstore_build_query_n{}", n), |b| {
            b.iter_batched(
                Index::<i64, u32>::with_rtree,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    black_box(idx.query_contained(region).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let envelope = AABB::from_corners(
                        [region.min_x, region.min_y],
                        [region.max_x, region.max_y],
                    );
                    black_box(tree.locate_in_envelope(&envelope).count());
                },
                BatchSize::SmallInput,
            )
        });

        let mut ours = Index::<i64, u32>::with_rtree();
        for (i, r) in rects.iter().copied().enumerate() {
            let _ = ours.insert(r, i as u32);
        }
        let theirs = RTree::bulk_load(to_rstar_rects(&rects));
        let envelope =
            AABB::from_corners([region.min_x, region.min_y], [region.max_x, region.max_y]);
        group.bench_function(format!("widgetstore_query_only_n{}", n), |b| {
            b.iter(|| black_box(ours.query_contained(region).len()));
        });
        group.bench_function(format!("rstar_query_only_n{}", n), |b| {
            b.iter(|| black_box(theirs.locate_in_envelope(&envelope).count()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_contained_external_compare_i64);
criterion_main!(benches);
