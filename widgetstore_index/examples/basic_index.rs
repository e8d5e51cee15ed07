// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Widgetstore Index: insert, move, and query by containment.

use widgetstore_index::{Aabb2D, Index};

fn main() {
    let mut idx = Index::<i64, u32>::with_rtree();
    let k1 = idx.insert(Aabb2D::<i64>::from_xywh(0, 0, 10, 10), 1);
    let _k2 = idx.insert(Aabb2D::<i64>::from_xywh(5, 5, 10, 10), 2);

    let region = Aabb2D::new(0, 0, 12, 12);
    println!("contained in {:?}: {:?}", region, idx.query_contained(region));

    // Move box 1 out of the region.
    idx.update(k1, Aabb2D::<i64>::from_xywh(20, 0, 10, 10));
    println!("after move: {:?}", idx.query_contained(region));
}
