// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration and ledger retention.
//!
//! Load a store configuration from TOML and show a cursor outliving the retained
//! version history.
//!
//! Run:
//! - `RUST_LOG=widgetstore=debug cargo run -p widgetstore_demos --example config_and_retention`

use tracing_subscriber::EnvFilter;
use widgetstore::{ListRequest, Rectangle, StoreConfig, WidgetStorage, WidgetStore};

const CONFIG: &str = r#"
lock-timeout-ms = 250
max-versions-to-store = 2
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = StoreConfig::from_toml_str(CONFIG)?;
    println!("{config:?}");
    let store = WidgetStore::new(config);

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(store.create(Rectangle::new(i * 10, 0, 8, 8), None)?.id);
    }
    let first = store.list(&ListRequest::new(2))?;
    let cursor = first.next_cursor.ok_or("expected more pages")?;
    println!("cursor {cursor:?} as token {cursor}");

    // Three moves overflow a two-entry ledger; the cursor's history is gone.
    for id in ids.iter().rev().take(3) {
        let w = store.get(id)?.ok_or("widget vanished")?;
        store.update(id, w.boundaries, Some(-1 - w.stack_index))?;
    }

    let next = store.list(&ListRequest::new(10).with_cursor(cursor))?;
    println!(
        "next page after eviction: {:?}",
        next.items
            .iter()
            .map(|w| (w.stack_index, w.id.as_str()))
            .collect::<Vec<_>>()
    );
    Ok(())
}
