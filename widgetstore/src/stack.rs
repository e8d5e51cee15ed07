// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack order: a unique, ordered mapping from stack index to record.
//!
//! Stack indices are unique but may have gaps. Placing a record on an occupied index
//! does not fail; instead the contiguous run starting at that index moves up by one
//! ([`StackOrder::shift_from`]) and the first gap above the run absorbs it.

use std::collections::BTreeMap;
use std::ops::{Bound, RangeInclusive};

use crate::error::StoreError;

/// Stack index given to the first record of an empty store.
pub const INITIAL_STACK_INDEX: i64 = 0;

/// Ordered, unique `stack index → value` map with shift-in-place renumbering.
///
/// Values are small handles (`Copy`); the records they name live elsewhere.
#[derive(Clone, Debug)]
pub struct StackOrder<V> {
    keys: BTreeMap<i64, V>,
}

impl<V: Copy> Default for StackOrder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy> StackOrder<V> {
    /// Create an empty stack order.
    pub fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Number of occupied indices.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no index is occupied.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The value at `key`.
    pub fn get(&self, key: i64) -> Option<V> {
        self.keys.get(&key).copied()
    }

    /// The highest occupied index.
    pub fn last_key(&self) -> Option<i64> {
        self.keys.last_key_value().map(|(k, _)| *k)
    }

    /// The index a new foreground record takes: [`INITIAL_STACK_INDEX`] when empty,
    /// one above the current top otherwise. `None` when the top is `i64::MAX`.
    pub fn next_foreground_key(&self) -> Option<i64> {
        match self.last_key() {
            None => Some(INITIAL_STACK_INDEX),
            Some(last) => last.checked_add(1),
        }
    }

    /// Occupy `key`, returning whatever was displaced.
    ///
    /// Callers keep indices unique by calling [`shift_from`](Self::shift_from) first.
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        let displaced = self.keys.insert(key, value);
        debug_assert!(displaced.is_none(), "stack index {key} was occupied");
        displaced
    }

    /// Vacate `key`.
    pub fn remove(&mut self, key: i64) -> Option<V> {
        self.keys.remove(&key)
    }

    /// Entries in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, V)> + '_ {
        self.keys.iter().map(|(k, v)| (*k, *v))
    }

    /// Entries at or above `key` (`inclusive`) or strictly above it.
    pub fn range_from(&self, key: i64, inclusive: bool) -> impl Iterator<Item = (i64, V)> + '_ {
        let lower = if inclusive {
            Bound::Included(key)
        } else {
            Bound::Excluded(key)
        };
        self.tail(lower)
    }

    /// Entries whose index lies in `range`.
    pub fn range(&self, range: RangeInclusive<i64>) -> impl Iterator<Item = (i64, V)> + '_ {
        self.keys.range(range).map(|(k, v)| (*k, *v))
    }

    /// Entries above `after`, or every entry when `after` is `None`.
    pub fn tail_after(&self, after: Option<i64>) -> impl Iterator<Item = (i64, V)> + '_ {
        self.tail(after.map_or(Bound::Unbounded, Bound::Excluded))
    }

    fn tail(&self, lower: Bound<i64>) -> impl Iterator<Item = (i64, V)> + '_ {
        self.keys
            .range((lower, Bound::Unbounded))
            .map(|(k, v)| (*k, *v))
    }

    /// Fail if shifting the run at `key` would push a record past `i64::MAX`.
    pub fn check_shift(&self, key: i64) -> Result<(), StoreError> {
        let mut expected = key;
        for (&k, _) in self.keys.range(key..) {
            if k != expected {
                return Ok(());
            }
            expected = k.checked_add(1).ok_or(StoreError::StackIndexOverflow)?;
        }
        Ok(())
    }

    /// Move the contiguous run starting at `key` up by one, vacating `key`.
    ///
    /// `on_shift(value, new_key)` is called once per moved value, bottom first.
    /// Returns the highest index written, or `None` when `key` was vacant and nothing
    /// moved. A run that would pass `i64::MAX` fails before anything moves.
    ///
    /// Values rotate through the run's existing slots, so the map only loses the
    /// run's bottom key and gains the single key above the run.
    pub fn shift_from(
        &mut self,
        key: i64,
        on_shift: impl FnMut(V, i64),
    ) -> Result<Option<i64>, StoreError> {
        self.check_shift(key)?;
        Ok(self.shift_unchecked(key, on_shift))
    }

    /// The rotation behind [`shift_from`](Self::shift_from); the run must end below
    /// `i64::MAX`.
    fn shift_unchecked(&mut self, key: i64, mut on_shift: impl FnMut(V, i64)) -> Option<i64> {
        let mut carry = self.keys.remove(&key)?;
        let mut next = key.checked_add(1)?;
        for (&k, slot) in self.keys.range_mut(next..) {
            if k != next {
                break;
            }
            on_shift(carry, k);
            carry = core::mem::replace(slot, carry);
            next = k.saturating_add(1);
        }
        debug_assert!(!self.keys.contains_key(&next), "run ended at i64::MAX");
        on_shift(carry, next);
        self.keys.insert(next, carry);
        Some(next)
    }
}
