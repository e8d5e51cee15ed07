// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region paging.
//!
//! Page through the widgets inside a region with opaque cursor tokens, moving a
//! widget behind the cursor between pages.
//!
//! Run:
//! - `cargo run -p widgetstore_demos --example region_paging`

use tracing_subscriber::EnvFilter;
use widgetstore::{
    Cursor, ListRequest, Rectangle, SequentialIdGenerator, StoreConfig, SystemClock,
    WidgetStorage, WidgetStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = WidgetStore::with_parts(
        StoreConfig::default(),
        SequentialIdGenerator::new("tile"),
        SystemClock,
    );
    for i in 0..12 {
        // Every third tile lies outside the region.
        let y = if i % 3 == 2 { 400 } else { 0 };
        store.create(Rectangle::new(i * 20, y, 15, 15), None)?;
    }
    let region = Rectangle::new(0, 0, 300, 100);

    let mut token: Option<String> = None;
    let mut page_no = 1;
    loop {
        let cursor = token.as_deref().map(Cursor::decode).transpose()?;
        let page = store.list(&ListRequest::new(3).with_region(region).after(cursor))?;
        let ids: Vec<_> = page.items.iter().map(|w| w.id.as_str()).collect();
        println!("page {page_no}: {ids:?}");

        if page_no == 1 {
            // A client that already saw page 1 still gets `tile-11` on a later page.
            let last = store.get("tile-11")?.ok_or("tile-11 missing")?;
            store.update(&last.id, last.boundaries, Some(0))?;
        }

        match page.next_cursor {
            Some(next) => {
                let encoded = next.encode()?;
                println!("  next token: {encoded}");
                token = Some(encoded);
            }
            None => break,
        }
        page_no += 1;
    }
    Ok(())
}
