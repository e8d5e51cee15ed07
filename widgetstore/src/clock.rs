// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time sources for `modified_at` stamps.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};

/// Source of modification timestamps.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that advances by a fixed step on every reading.
///
/// Each call to [`now`](Clock::now) returns a distinct, strictly later instant, which
/// makes modification order observable in tests and simulations.
#[derive(Debug)]
pub struct TickingClock {
    origin: DateTime<Utc>,
    step: TimeDelta,
    ticks: AtomicI64,
}

impl TickingClock {
    /// Start at `origin`, advancing by `step` per reading.
    pub fn new(origin: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            origin,
            step,
            ticks: AtomicI64::new(0),
        }
    }

    /// Start at the Unix epoch, advancing one millisecond per reading.
    pub fn from_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH, TimeDelta::milliseconds(1))
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        let n = self.ticks.fetch_add(1, Ordering::Relaxed);
        let offset = self.step.checked_mul(n.try_into().unwrap_or(i32::MAX));
        offset
            .and_then(|d| self.origin.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
