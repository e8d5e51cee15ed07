// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles.

use serde::{Deserialize, Serialize};
use widgetstore_index::Aabb2D;

use crate::error::StoreError;

/// An axis-aligned rectangle with integer origin and size.
///
/// A valid rectangle has a strictly positive width and height and edges that fit in
/// `i64`. Edges are inclusive: a rectangle contains another that shares its border.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Horizontal extent.
    pub width: i64,
    /// Vertical extent.
    pub height: i64,
}

impl Rectangle {
    /// Create a rectangle from origin and size. No validation is performed.
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `x + width`, saturating for rectangles that were never validated.
    pub const fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// `y + height`, saturating for rectangles that were never validated.
    pub const fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// Check that the size is positive and the far edges are representable.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(StoreError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            return Err(StoreError::CoordinateOverflow);
        }
        Ok(())
    }

    /// Whether `other` lies entirely inside `self`, borders included.
    pub fn contains(&self, other: &Self) -> bool {
        self.to_aabb().contains(&other.to_aabb())
    }

    /// Whether the two rectangles share at least one point, borders included.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.to_aabb().overlaps(&other.to_aabb())
    }

    pub(crate) const fn to_aabb(self) -> Aabb2D<i64> {
        Aabb2D::<i64>::from_xywh(self.x, self.y, self.width, self.height)
    }
}
