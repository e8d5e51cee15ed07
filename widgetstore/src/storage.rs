// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The storage capability shared by widget store implementations.

use crate::error::StoreError;
use crate::rect::Rectangle;
use crate::widget::{ListRequest, Page, Widget};

/// Operations every widget store provides.
///
/// Stack indices stay unique: placing a widget on an occupied index moves the
/// contiguous run of widgets starting there up by one.
pub trait WidgetStorage {
    /// Store a new widget.
    ///
    /// Without an explicit `stack_index` the widget goes to the foreground.
    fn create(&self, boundaries: Rectangle, stack_index: Option<i64>)
    -> Result<Widget, StoreError>;

    /// Replace a widget's boundaries and optionally move it in the stack.
    ///
    /// Without an explicit `stack_index` the widget goes to the foreground, staying
    /// put if it is already there. Returns `Ok(None)` for an unknown id.
    fn update(
        &self,
        id: &str,
        boundaries: Rectangle,
        stack_index: Option<i64>,
    ) -> Result<Option<Widget>, StoreError>;

    /// Remove a widget. Unknown ids are ignored.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Look up a widget by id.
    fn get(&self, id: &str) -> Result<Option<Widget>, StoreError>;

    /// One page of widgets in ascending stack order.
    fn list(&self, request: &ListRequest) -> Result<Page, StoreError>;
}
