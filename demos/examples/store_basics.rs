// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store basics.
//!
//! Create widgets, place one on an occupied stack index, and list them.
//!
//! Run:
//! - `RUST_LOG=widgetstore=debug cargo run -p widgetstore_demos --example store_basics`

use tracing_subscriber::EnvFilter;
use widgetstore::{ListRequest, Rectangle, StoreConfig, WidgetStorage, WidgetStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = WidgetStore::new(StoreConfig::default());
    let a = store.create(Rectangle::new(0, 0, 100, 100), None)?;
    let b = store.create(Rectangle::new(20, 20, 100, 100), None)?;
    println!("a at {}, b at {}", a.stack_index, b.stack_index);

    // Index 0 is taken by `a`; `a` and `b` move up to make room.
    let c = store.create(Rectangle::new(40, 40, 50, 50), Some(0))?;
    println!("c placed at {}", c.stack_index);

    // Bring `a` to the foreground.
    store.update(&a.id, a.boundaries, None)?;

    for w in store.list(&ListRequest::default())?.items {
        println!("{:>2}  {}  {:?}", w.stack_index, w.id, w.boundaries);
    }

    store.delete(&b.id)?;
    println!(
        "after delete: {} widgets, version {}",
        store.len()?,
        store.version()?
    );
    Ok(())
}
