// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Version ledger: a bounded history of rewritten stack ranges.
//!
//! Every mutation that places a record at some stack index records the range of
//! indices it wrote, tagged with the store version it produced. A cursor remembers the
//! version its page was read at and the stack index of the last item returned. When
//! the next page is requested, the entries newer than the cursor tell which indices at
//! or below the cursor boundary may now hold records the client has not seen; those
//! ranges are scanned again before the plain tail above the boundary.
//!
//! The ledger keeps only the most recent entries. A cursor older than the retained
//! history cannot be reconciled and degrades to a plain tail scan.

use std::collections::VecDeque;

use crate::cursor::Cursor;

/// One rewritten stack range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Store version produced by the mutation.
    pub version: u64,
    /// Lowest stack index written.
    pub from: i64,
    /// Highest stack index written.
    pub to: i64,
}

/// An inclusive range of stack indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StackRange {
    /// Lower bound, inclusive.
    pub from: i64,
    /// Upper bound, inclusive.
    pub to: i64,
}

impl StackRange {
    /// Whether `stack_index` lies in the range.
    pub fn contains(&self, stack_index: i64) -> bool {
        self.from <= stack_index && stack_index <= self.to
    }
}

/// Which stack indices the next page is drawn from.
///
/// The ordered walk visits [`rescan`](Self::rescan) ranges first, then every index
/// above [`after`](Self::after).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Continuation {
    after: Option<i64>,
    rescan: Vec<StackRange>,
    degraded: bool,
}

impl Continuation {
    /// Every stack index, as for a first page.
    pub fn from_start() -> Self {
        Self {
            after: None,
            rescan: Vec::new(),
            degraded: false,
        }
    }

    /// Indices strictly above `stack_index` only.
    pub fn tail(stack_index: i64) -> Self {
        Self {
            after: Some(stack_index),
            rescan: Vec::new(),
            degraded: false,
        }
    }

    /// Lower exclusive bound of the tail, `None` for an unbounded walk.
    pub fn after(&self) -> Option<i64> {
        self.after
    }

    /// Sorted, disjoint, non-adjacent ranges at or below the tail bound.
    pub fn rescan(&self) -> &[StackRange] {
        &self.rescan
    }

    /// Whether the cursor's history was evicted and only the tail is scanned.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether a record at `stack_index` belongs to the continuation.
    pub fn admits(&self, stack_index: i64) -> bool {
        if self.after.is_none_or(|a| stack_index > a) {
            return true;
        }
        let i = self.rescan.partition_point(|r| r.to < stack_index);
        self.rescan.get(i).is_some_and(|r| r.contains(stack_index))
    }
}

/// Bounded, append-only history of [`LedgerEntry`] values in version order.
#[derive(Clone, Debug)]
pub struct VersionLedger {
    entries: VecDeque<LedgerEntry>,
    capacity: usize,
    evicted_through: Option<u64>,
}

impl VersionLedger {
    /// Create a ledger that retains at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            evicted_through: None,
        }
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded or everything was evicted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.entries.iter()
    }

    /// Record that `version` wrote stack indices `from..=to`.
    ///
    /// Versions must be appended in increasing order.
    pub fn append(&mut self, version: u64, from: i64, to: i64) {
        debug_assert!(
            self.entries.back().is_none_or(|e| e.version < version),
            "ledger versions must increase"
        );
        debug_assert!(from <= to, "ledger range must not be inverted");
        self.entries.push_back(LedgerEntry { version, from, to });
        while self.entries.len() > self.capacity {
            if let Some(old) = self.entries.pop_front() {
                self.evicted_through = Some(old.version);
            }
        }
    }

    /// Whether every entry newer than `version` is still retained.
    pub fn is_retained(&self, version: u64) -> bool {
        self.evicted_through.is_none_or(|e| e <= version)
    }

    /// Work out which stack indices the page after `cursor` must cover.
    pub fn reconcile(&self, cursor: &Cursor) -> Continuation {
        let z = cursor.stack_index;
        if !self.is_retained(cursor.version) {
            return Continuation {
                degraded: true,
                ..Continuation::tail(z)
            };
        }
        let start = self.entries.partition_point(|e| e.version <= cursor.version);
        let mut ranges: Vec<StackRange> = self
            .entries
            .range(start..)
            .filter(|e| e.from <= z)
            .map(|e| StackRange {
                from: e.from,
                to: e.to.min(z),
            })
            .collect();
        Continuation {
            rescan: merge(&mut ranges),
            ..Continuation::tail(z)
        }
    }
}

fn merge(ranges: &mut [StackRange]) -> Vec<StackRange> {
    ranges.sort_unstable_by_key(|r| r.from);
    let mut out: Vec<StackRange> = Vec::with_capacity(ranges.len());
    for r in ranges.iter() {
        match out.last_mut() {
            Some(last) if r.from <= last.to.saturating_add(1) => last.to = last.to.max(r.to),
            _ => out.push(*r),
        }
    }
    out
}
