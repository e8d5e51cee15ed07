// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-memory widget store.
//!
//! One reader-writer lock guards the whole state: the record slab, the id map, the
//! stack order, the spatial index, and the version ledger. Every operation takes the
//! lock once, bounded by [`StoreConfig::lock_timeout`], and finishes its work before
//! releasing it, so callers never observe a half-applied shift.

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use widgetstore_index::{Index, RTreeIndex};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::cursor::Cursor;
use crate::error::StoreError;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::ledger::{Continuation, VersionLedger};
use crate::records::{RecordId, Records};
use crate::rect::Rectangle;
use crate::stack::StackOrder;
use crate::storage::WidgetStorage;
use crate::widget::{ListRequest, Page, Widget};

#[derive(Debug)]
struct StoreState {
    records: Records,
    by_id: HashMap<String, RecordId>,
    stack: StackOrder<RecordId>,
    spatial: RTreeIndex<i64, RecordId>,
    ledger: VersionLedger,
    version: u64,
}

impl StoreState {
    fn new(config: &StoreConfig) -> Self {
        Self {
            records: Records::default(),
            by_id: HashMap::new(),
            stack: StackOrder::new(),
            spatial: Index::with_rtree(),
            ledger: VersionLedger::new(config.max_versions_to_store),
            version: 0,
        }
    }

    fn widget(&self, rid: RecordId) -> Option<&Widget> {
        self.records.get(rid).map(|r| &r.widget)
    }

    /// Vacate `key`, stamping every widget the shift moves.
    fn shift_from(&mut self, key: i64, now: DateTime<Utc>) -> Result<Option<i64>, StoreError> {
        let Self { stack, records, .. } = self;
        stack.shift_from(key, |rid, new_key| {
            if let Some(r) = records.get_mut(rid) {
                debug!(
                    id = %r.widget.id,
                    from = r.widget.stack_index,
                    to = new_key,
                    "shifted widget"
                );
                r.widget.stack_index = new_key;
                r.widget.modified_at = now;
            }
        })
    }

    /// Add a widget whose stack index is already vacant.
    fn insert(&mut self, widget: Widget) {
        let aabb = widget.boundaries.to_aabb();
        let key = widget.stack_index;
        let id = widget.id.clone();
        let Self {
            records, spatial, ..
        } = &mut *self;
        let rid = records.insert(|rid| (widget, spatial.insert(aabb, rid)));
        self.stack.insert(key, rid);
        self.by_id.insert(id, rid);
    }

    /// Bump the version and record that it wrote `from..=to`.
    fn commit(&mut self, from: i64, to: i64) -> u64 {
        self.version += 1;
        self.ledger.append(self.version, from, to);
        self.version
    }

    fn ordered(&self, continuation: &Continuation, fetch: usize) -> Vec<&Widget> {
        let rescan = continuation
            .rescan()
            .iter()
            .flat_map(|r| self.stack.range(r.from..=r.to));
        rescan
            .chain(self.stack.tail_after(continuation.after()))
            .filter_map(|(_, rid)| self.widget(rid))
            .take(fetch)
            .collect()
    }

    /// The `fetch` lowest-stacked widgets inside `region` that the continuation admits.
    fn top_contained(
        &self,
        region: Rectangle,
        continuation: &Continuation,
        fetch: usize,
    ) -> Vec<&Widget> {
        let mut top: Vec<&Widget> = Vec::with_capacity(fetch.min(self.stack.len()));
        self.spatial.visit_contained(region.to_aabb(), |_, rid| {
            let Some(w) = self.widget(rid) else {
                return;
            };
            if !continuation.admits(w.stack_index) {
                return;
            }
            let at = top.partition_point(|t| t.stack_index < w.stack_index);
            if at < fetch {
                top.insert(at, w);
                top.truncate(fetch);
            }
        });
        top
    }
}

/// Thread-safe in-memory [`WidgetStorage`].
///
/// Share it across threads by reference or behind an `Arc`. Ids come from `G` and
/// modification stamps from `C`.
///
/// ```rust
/// use widgetstore::{ListRequest, Rectangle, WidgetStorage, WidgetStore};
///
/// let store = WidgetStore::default();
/// let a = store.create(Rectangle::new(0, 0, 10, 10), None).unwrap();
/// let b = store.create(Rectangle::new(5, 5, 10, 10), Some(a.stack_index)).unwrap();
///
/// // `b` took `a`'s place and `a` moved up.
/// assert_eq!(b.stack_index, 0);
/// assert_eq!(store.get(&a.id).unwrap().unwrap().stack_index, 1);
///
/// let page = store.list(&ListRequest::new(10)).unwrap();
/// let ids: Vec<_> = page.items.iter().map(|w| w.id.as_str()).collect();
/// assert_eq!(ids, [b.id.as_str(), a.id.as_str()]);
/// ```
pub struct WidgetStore<G = UuidGenerator, C = SystemClock> {
    state: RwLock<StoreState>,
    config: StoreConfig,
    ids: G,
    clock: C,
}

impl<G, C> core::fmt::Debug for WidgetStore<G, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WidgetStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WidgetStore {
    /// A store with random UUID ids and wall-clock stamps.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_parts(config, UuidGenerator, SystemClock)
    }
}

impl Default for WidgetStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<G: IdGenerator, C: Clock> WidgetStore<G, C> {
    /// A store with explicit id and time sources.
    pub fn with_parts(config: StoreConfig, ids: G, clock: C) -> Self {
        Self {
            state: RwLock::new(StoreState::new(&config)),
            config,
            ids,
            clock,
        }
    }

    /// The configuration the store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of live widgets.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.by_id.len())
    }

    /// Whether the store holds no widgets.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.by_id.is_empty())
    }

    /// The current store version: the number of applied stack or boundary changes.
    pub fn version(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.version)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state
            .try_read_for(self.config.lock_timeout)
            .ok_or_else(|| self.timed_out("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state
            .try_write_for(self.config.lock_timeout)
            .ok_or_else(|| self.timed_out("write"))
    }

    fn timed_out(&self, mode: &'static str) -> StoreError {
        let timeout = self.config.lock_timeout;
        warn!(mode, ?timeout, "store lock acquisition timed out");
        StoreError::LockTimeout { timeout }
    }
}

impl<G: IdGenerator, C: Clock> WidgetStorage for WidgetStore<G, C> {
    fn create(
        &self,
        boundaries: Rectangle,
        stack_index: Option<i64>,
    ) -> Result<Widget, StoreError> {
        boundaries.validate()?;
        let mut guard = self.write()?;
        let state = &mut *guard;
        let id = self.ids.generate();
        if state.by_id.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        let key = match stack_index {
            Some(key) => key,
            None => state
                .stack
                .next_foreground_key()
                .ok_or(StoreError::StackIndexOverflow)?,
        };
        let now = self.clock.now();
        let top = state.shift_from(key, now)?.unwrap_or(key);
        let widget = Widget {
            id,
            boundaries,
            stack_index: key,
            modified_at: now,
        };
        state.insert(widget.clone());
        let version = state.commit(key, top);
        info!(id = %widget.id, stack_index = key, version, "created widget");
        Ok(widget)
    }

    fn update(
        &self,
        id: &str,
        boundaries: Rectangle,
        stack_index: Option<i64>,
    ) -> Result<Option<Widget>, StoreError> {
        boundaries.validate()?;
        let mut guard = self.write()?;
        let state = &mut *guard;
        let Some(rid) = state.by_id.get(id).copied() else {
            warn!(id, "update of unknown widget");
            return Ok(None);
        };
        let Some(record) = state.records.get(rid) else {
            return Ok(None);
        };
        let spatial = record.spatial;
        let mut widget = record.widget.clone();
        let (old_key, old_boundaries) = (widget.stack_index, widget.boundaries);

        let key = match stack_index {
            Some(key) => key,
            None => match state.stack.last_key() {
                Some(last) if last != old_key => {
                    last.checked_add(1).ok_or(StoreError::StackIndexOverflow)?
                }
                _ => old_key,
            },
        };
        if key == old_key && boundaries == old_boundaries {
            debug!(id, stack_index = key, "update changes nothing");
            return Ok(Some(widget));
        }

        let now = self.clock.now();
        let mut top = key;
        if key != old_key {
            state.stack.remove(old_key);
            top = match state.shift_from(key, now) {
                Ok(top) => top.unwrap_or(key),
                Err(e) => {
                    state.stack.insert(old_key, rid);
                    return Err(e);
                }
            };
            state.stack.insert(key, rid);
        }
        if boundaries != old_boundaries {
            state.spatial.update(spatial, boundaries.to_aabb());
        }
        widget.stack_index = key;
        widget.boundaries = boundaries;
        widget.modified_at = now;
        let record = state.records.get_mut(rid);
        // `by_id` only names live records, and the shift above never frees one.
        debug_assert!(record.is_some(), "id map named a freed record");
        if let Some(record) = record {
            record.widget = widget.clone();
        }

        let version = state.commit(key, top);
        info!(id, stack_index = key, version, "updated widget");
        Ok(Some(widget))
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        let Some(rid) = state.by_id.remove(id) else {
            debug!(id, "delete of unknown widget");
            return Ok(());
        };
        if let Some(record) = state.records.remove(rid) {
            let stack_index = record.widget.stack_index;
            state.stack.remove(stack_index);
            state.spatial.remove(record.spatial);
            info!(id, stack_index, version = state.version, "deleted widget");
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Widget>, StoreError> {
        let state = self.read()?;
        Ok(state
            .by_id
            .get(id)
            .and_then(|rid| state.widget(*rid))
            .cloned())
    }

    fn list(&self, request: &ListRequest) -> Result<Page, StoreError> {
        if request.limit == 0 {
            return Err(StoreError::InvalidLimit);
        }
        if let Some(region) = &request.region {
            region.validate()?;
        }
        let state = self.read()?;
        let continuation = match &request.cursor {
            None => Continuation::from_start(),
            Some(cursor) => {
                let continuation = state.ledger.reconcile(cursor);
                if continuation.is_degraded() {
                    debug!(
                        version = cursor.version,
                        stack_index = cursor.stack_index,
                        "cursor history evicted, continuing above its stack index"
                    );
                }
                continuation
            }
        };

        let fetch = request.limit.saturating_add(1);
        let mut hits = match request.region {
            Some(region) => state.top_contained(region, &continuation, fetch),
            None => state.ordered(&continuation, fetch),
        };
        let next_cursor = if hits.len() > request.limit {
            hits.truncate(request.limit);
            hits.last()
                .map(|w| Cursor::new(state.version, w.stack_index))
        } else {
            None
        };
        Ok(Page {
            items: hits.into_iter().cloned().collect(),
            next_cursor,
        })
    }
}
