// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=widgetstore --heading-base-level=0

//! Widgetstore: in-memory storage for rectangular widgets.
//!
//! A widget is a [`Rectangle`] with a unique *stack index* (its draw order) and a
//! modification timestamp. The store keeps three views of the same records in step:
//!
//! - a stack order ([`StackOrder`]) that keeps stack indices unique by shifting
//!   contiguous runs up when a widget is placed on an occupied index;
//! - an R-tree from [`widgetstore_index`] answering "which widgets lie entirely inside
//!   this region";
//! - a bounded [`VersionLedger`] of rewritten stack ranges, which lets a [`Cursor`]
//!   resume a listing after concurrent writes without skipping widgets.
//!
//! All access goes through [`WidgetStorage`]; [`WidgetStore`] is the thread-safe
//! in-memory implementation.
//!
//! # Example
//!
//! ```rust
//! use widgetstore::{ListRequest, Rectangle, StoreConfig, WidgetStorage, WidgetStore};
//!
//! let store = WidgetStore::new(StoreConfig::default());
//! let a = store.create(Rectangle::new(0, 0, 100, 100), None).unwrap();
//! let b = store.create(Rectangle::new(0, 50, 100, 100), None).unwrap();
//! let _c = store.create(Rectangle::new(50, 50, 100, 100), None).unwrap();
//!
//! let page = store
//!     .list(&ListRequest::new(10).with_region(Rectangle::new(0, 0, 100, 150)))
//!     .unwrap();
//! assert_eq!(page.items, [a, b]);
//! ```
//!
//! ## Paging
//!
//! [`Page::next_cursor`] is set when more widgets may follow. Pass it back through
//! [`ListRequest::with_cursor`], or hand clients the opaque [`Cursor::encode`] token.
//! Widgets moved behind the cursor between two pages are served on the next page;
//! a widget may appear on more than one page, but never twice on the same one.
//!
//! ## Logging
//!
//! The store emits `tracing` events (creates, updates, and deletes at `info`,
//! lock timeouts at `warn`, shifts at `debug`) and installs no subscriber.

pub mod clock;
pub mod config;
pub mod cursor;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod rect;
pub mod stack;
pub mod storage;
pub mod store;
pub mod widget;

mod records;

pub use clock::{Clock, SystemClock, TickingClock};
pub use config::StoreConfig;
pub use cursor::Cursor;
pub use error::{ConfigError, CursorError, StoreError};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use ledger::{Continuation, LedgerEntry, StackRange, VersionLedger};
pub use rect::Rectangle;
pub use stack::{INITIAL_STACK_INDEX, StackOrder};
pub use storage::WidgetStorage;
pub use store::WidgetStore;
pub use widget::{ListRequest, Page, Widget};
