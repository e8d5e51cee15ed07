// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=widgetstore_index --heading-base-level=0

//! Widgetstore Index: a generic 2D AABB index with containment queries.
//!
//! Widgetstore Index is the spatial building block of the widget store.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with small `Copy` payloads.
//! - Query for boxes *contained* in a region, or boxes intersecting a rectangle.
//! - Handles are generational [`Key`]s, so a stale handle never reaches a newer entry.
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//!
//! Backends are pluggable via the [`Backend`] trait so the spatial strategy can change
//! without API churn. The default backend is a flat vector (linear scan); the R-tree
//! backend is generic over the scalar and uses widened accumulator types (i64→i128)
//! for its SAH-like splits.
//!
//! # Example
//!
//! ```rust
//! use widgetstore_index::{Aabb2D, Index};
//!
//! let mut idx = Index::<i64, u32>::with_rtree();
//! let a = idx.insert(Aabb2D::<i64>::from_xywh(0, 0, 100, 100), 1);
//! let _b = idx.insert(Aabb2D::<i64>::from_xywh(0, 50, 100, 100), 2);
//! let _c = idx.insert(Aabb2D::<i64>::from_xywh(50, 50, 100, 100), 3);
//!
//! // Containment, not overlap: `c` pokes out of the region on the right.
//! let mut hits: Vec<u32> = idx
//!     .query_contained(Aabb2D::<i64>::from_xywh(0, 0, 100, 150))
//!     .into_iter()
//!     .map(|(_, p)| p)
//!     .collect();
//! hits.sort_unstable();
//! assert_eq!(hits, [1, 2]);
//!
//! // Moving `a` out of the region drops it from the result.
//! idx.update(a, Aabb2D::<i64>::from_xywh(500, 500, 10, 10));
//! assert_eq!(idx.query_contained(Aabb2D::<i64>::from_xywh(0, 0, 100, 150)).len(), 1);
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): simplest and smallest, linear scans. Good for very small sets
//!   and as a reference answer in tests.
//! - `RTreeI64`/`RTreeF64`: R-tree with SAH-like splits and widened metrics; good
//!   general-purpose index when distribution is irregular and updates are frequent.
//!   See the [`backends`] docs for a brief SAH overview.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::rtree::{RTree, RTreeF64, RTreeI64};
pub use index::{Index, IndexGeneric, Key, RTreeIndex};
pub use types::{Aabb2D, Scalar};
