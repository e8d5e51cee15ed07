// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget snapshots and listing requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::rect::Rectangle;

/// A snapshot of a stored widget.
///
/// The store owns the live record; every call hands out a copy taken under the lock.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Store-assigned id.
    pub id: String,
    /// Placement on the plane.
    pub boundaries: Rectangle,
    /// Draw order, unique among live widgets. Higher is closer to the foreground.
    #[serde(rename = "zIndex")]
    pub stack_index: i64,
    /// When the widget was created, updated, or shifted.
    pub modified_at: DateTime<Utc>,
}

/// Parameters for [`WidgetStorage::list`](crate::WidgetStorage::list).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    /// Only return widgets entirely inside this region.
    pub region: Option<Rectangle>,
    /// Continue after a previous page.
    pub cursor: Option<Cursor>,
    /// Maximum number of widgets to return. Must be positive.
    pub limit: usize,
}

impl ListRequest {
    /// Page size used by [`ListRequest::default`].
    pub const DEFAULT_LIMIT: usize = 10;

    /// A first-page request with the given limit.
    pub fn new(limit: usize) -> Self {
        Self {
            region: None,
            cursor: None,
            limit,
        }
    }

    /// Restrict the listing to widgets inside `region`.
    #[must_use]
    pub fn with_region(mut self, region: Rectangle) -> Self {
        self.region = Some(region);
        self
    }

    /// Continue from `cursor`.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Continue from `cursor` if there is one; used to follow [`Page::next_cursor`].
    #[must_use]
    pub fn after(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Default for ListRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

/// One page of a listing, in ascending stack order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    /// The widgets on this page.
    pub items: Vec<Widget>,
    /// Where the next page starts, if more widgets may follow.
    pub next_cursor: Option<Cursor>,
}
