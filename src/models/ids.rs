//! Record identifiers and owner identities
//!
//! Remote document stores assign their own opaque keys, so record IDs are
//! string-backed. Locally created records get a random UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Pseudo-user identifier used when no authenticated session exists
pub const GUEST_ID: &str = "guest";

/// Unique identifier of a persisted record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an identifier assigned elsewhere (e.g. a document key)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact listings
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

/// The user context records belong to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Local-only guest mode
    Guest,
    /// An authenticated user
    User { uid: String },
}

impl Identity {
    /// Build an identity from an optional user id; blank ids mean guest
    pub fn from_uid(uid: Option<&str>) -> Self {
        match uid.map(str::trim) {
            Some(uid) if !uid.is_empty() => Self::User {
                uid: uid.to_string(),
            },
            _ => Self::Guest,
        }
    }

    /// Owner identifier stamped on records (`guest` for guests)
    pub fn uid(&self) -> &str {
        match self {
            Self::Guest => GUEST_ID,
            Self::User { uid } => uid,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Key under which this identity's local state is stored
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced so the key is always
    /// a safe file stem.
    pub fn storage_key(&self) -> String {
        let safe: String = self
            .uid()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("fintrack-{}", safe)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::User { uid } => write!(f, "user {}", uid),
        }
    }
}
