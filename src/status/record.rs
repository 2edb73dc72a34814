//! Status record types
//!
//! This module defines the status record, its identifier, and the
//! caller-supplied draft a record is created from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a status record
///
/// Assigned monotonically by the store; never reused within a process, even
/// after the record is deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StatusId(u64);

impl StatusId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published status record
///
/// Fields are immutable after creation; there is no update operation. The
/// store stamps `created_at` and `expires_at` — callers never set either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Store-assigned identifier
    pub id: StatusId,
    /// Publisher's user id
    pub user_id: String,
    /// Publisher's display name
    pub user_name: String,
    /// Optional text payload
    pub content: Option<String>,
    /// Optional reference to externally stored media (not validated)
    pub media_url: Option<String>,
    /// When the store created the record
    pub created_at: DateTime<Utc>,
    /// Hard deadline, `created_at + ttl`; never extended
    pub expires_at: DateTime<Utc>,
}

impl Status {
    /// Whether the record is live at `now`
    ///
    /// Evaluated at read and sweep time, never cached.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Caller-supplied input for creating a status
///
/// Identity fields are required and validated by the store; content and
/// media url are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusDraft {
    pub user_id: String,
    pub user_name: String,
    pub content: Option<String>,
    pub media_url: Option<String>,
}

impl StatusDraft {
    /// Create a draft with the required publisher identity
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            content: None,
            media_url: None,
        }
    }

    /// Set the text payload
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the media reference
    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }
}
