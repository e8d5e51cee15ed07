// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`WidgetStorage`](crate::WidgetStorage) operations.
///
/// Absence is not an error: `get` and `update` report an unknown id as `Ok(None)`
/// and `delete` of an unknown id succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store lock was not acquired within the configured timeout.
    #[error("store lock not acquired within {timeout:?}")]
    LockTimeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },
    /// Width or height is not strictly positive.
    #[error("invalid geometry: width and height must be positive, got {width}x{height}")]
    InvalidGeometry {
        /// Rejected width.
        width: i64,
        /// Rejected height.
        height: i64,
    },
    /// The right or bottom edge of a rectangle does not fit in `i64`.
    #[error("rectangle edges overflow the coordinate space")]
    CoordinateOverflow,
    /// A page limit of zero was requested.
    #[error("page limit must be positive")]
    InvalidLimit,
    /// Placing a widget would need a stack index beyond `i64::MAX`.
    #[error("stack index space exhausted")]
    StackIndexOverflow,
    /// The id generator produced an id that is already live.
    #[error("generated id `{0}` is already in use")]
    DuplicateId(String),
}

/// Errors decoding a transport cursor token.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The token is not standard base64.
    #[error("cursor is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The decoded payload is not a `{"v": .., "z": ..}` object.
    #[error("cursor payload is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has wrongly typed keys.
    #[error("invalid store config: {0}")]
    Toml(#[from] toml::de::Error),
    /// `max-versions-to-store` must be at least one.
    #[error("max-versions-to-store must be at least 1")]
    EmptyLedger,
}
