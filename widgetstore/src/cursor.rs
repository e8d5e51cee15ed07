// Copyright 2025 the Widgetstore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pagination cursors and their transport encoding.

use core::fmt;
use core::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::CursorError;

/// Position of a client in a paged listing.
///
/// On the wire a cursor is the standard base64 encoding of `{"v": version, "z": stack_index}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    /// Store version the page was read at.
    #[serde(rename = "v")]
    pub version: u64,
    /// Stack index of the last item on the page.
    #[serde(rename = "z")]
    pub stack_index: i64,
}

impl Cursor {
    /// Create a cursor.
    pub const fn new(version: u64, stack_index: i64) -> Self {
        Self {
            version,
            stack_index,
        }
    }

    /// Encode as an opaque transport token.
    pub fn encode(&self) -> Result<String, CursorError> {
        Ok(STANDARD.encode(serde_json::to_vec(self)?))
    }

    /// Decode a token produced by [`encode`](Self::encode).
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = STANDARD.decode(token.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode().map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_base64_of_short_json() {
        let token = Cursor::new(7, -3).encode().unwrap();
        let raw = STANDARD.decode(&token).unwrap();
        assert_eq!(std::str::from_utf8(&raw).unwrap(), r#"{"v":7,"z":-3}"#);
        assert_eq!(Cursor::decode(&token).unwrap(), Cursor::new(7, -3));
    }

    #[test]
    fn decodes_tokens_with_reordered_keys() {
        let token = STANDARD.encode(r#"{"z": 12, "v": 4}"#);
        let cursor: Cursor = token.parse().unwrap();
        assert_eq!(cursor, Cursor::new(4, 12));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            Cursor::decode("not base64!"),
            Err(CursorError::Base64(_))
        ));
        let not_json = STANDARD.encode("hello");
        assert!(matches!(
            Cursor::decode(&not_json),
            Err(CursorError::Json(_))
        ));
        let missing_field = STANDARD.encode(r#"{"v": 1}"#);
        assert!(matches!(
            Cursor::decode(&missing_field),
            Err(CursorError::Json(_))
        ));
    }

    #[test]
    fn display_matches_encode() {
        let c = Cursor::new(3, 41);
        assert_eq!(c.to_string(), c.encode().unwrap());
    }

    #[test]
    fn extreme_values_survive_transport() {
        let c = Cursor::new(u64::MAX, i64::MIN);
        assert_eq!(c.to_string().parse::<Cursor>().unwrap(), c);
    }
}
