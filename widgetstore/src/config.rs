// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a [`WidgetStore`](crate::WidgetStore).
///
/// Deserializes from kebab-case keys; missing keys take their defaults:
///
/// ```toml
/// lock-timeout-ms = 1000
/// max-versions-to-store = 1024
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct StoreConfig {
    /// How long an operation waits for the store lock before failing.
    #[serde(rename = "lock-timeout-ms", with = "millis")]
    pub lock_timeout: Duration,
    /// How many ledger entries are kept for cursor reconciliation. Never zero.
    pub max_versions_to_store: usize,
}

impl StoreConfig {
    /// Default lock acquisition timeout.
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(1000);
    /// Default ledger capacity.
    pub const DEFAULT_MAX_VERSIONS_TO_STORE: usize = 1024;

    /// Parse a TOML document with the keys shown above.
    ///
    /// A ledger capacity of zero is rejected with [`ConfigError::EmptyLedger`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        if config.max_versions_to_store == 0 {
            return Err(ConfigError::EmptyLedger);
        }
        Ok(config)
    }

    /// Set the lock acquisition timeout.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the ledger capacity.
    #[must_use]
    pub fn with_max_versions_to_store(mut self, max: NonZeroUsize) -> Self {
        self.max_versions_to_store = max.get();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Self::DEFAULT_LOCK_TIMEOUT,
            max_versions_to_store: Self::DEFAULT_MAX_VERSIONS_TO_STORE,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
