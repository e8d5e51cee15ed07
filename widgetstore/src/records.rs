// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record slab addressed by generational handles.

use widgetstore_index::Key;

use crate::widget::Widget;

/// Generational handle to a live record.
///
/// The stack order and the spatial index carry these instead of widget ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RecordId(u32, u32);

impl RecordId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Record handles are 32-bit; a store never holds 2^32 records."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Record {
    generation: u32,
    pub(crate) widget: Widget,
    pub(crate) spatial: Key,
}

#[derive(Debug, Default)]
pub(crate) struct Records {
    slots: Vec<Option<Record>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl Records {
    /// Allocate a slot; `build` receives the new handle so indices can point back at it.
    pub(crate) fn insert(&mut self, build: impl FnOnce(RecordId) -> (Widget, Key)) -> RecordId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        let id = RecordId::new(idx, generation);
        let (widget, spatial) = build(id);
        self.slots[idx] = Some(Record {
            generation,
            widget,
            spatial,
        });
        id
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<&Record> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|r| r.generation == id.1)
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|r| r.generation == id.1)
    }

    pub(crate) fn remove(&mut self, id: RecordId) -> Option<Record> {
        self.get(id)?;
        let record = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use widgetstore_index::{Aabb2D, Index};

    use super::*;
    use crate::rect::Rectangle;

    fn widget(id: &str) -> Widget {
        Widget {
            id: id.into(),
            boundaries: Rectangle::new(0, 0, 1, 1),
            stack_index: 0,
            modified_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn reused_slots_reject_stale_handles() {
        let mut spatial = Index::<i64, u32>::new();
        let key = spatial.insert(Aabb2D::new(0, 0, 1, 1), 0);
        let mut records = Records::default();

        let a = records.insert(|_| (widget("a"), key));
        assert_eq!(records.remove(a).map(|r| r.widget.id), Some("a".into()));
        let b = records.insert(|_| (widget("b"), key));

        assert_eq!(a.idx(), b.idx(), "slot should be reused");
        assert!(records.get(a).is_none());
        assert!(records.get_mut(a).is_none());
        assert!(records.remove(a).is_none());
        assert_eq!(records.get(b).map(|r| r.widget.id.as_str()), Some("b"));
    }
}
