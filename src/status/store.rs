//! Status store implementation
//!
//! The central store that owns all live status records. Every mutation and
//! query goes through the single `RwLock` around the record map, so callers
//! never observe a record mid-creation or a partially-applied batch delete.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};

use super::config::StoreConfig;
use super::error::StoreError;
use super::record::{Status, StatusDraft, StatusId};

/// In-memory store for ephemeral status records
///
/// Thread-safe via `RwLock`; critical sections are pure in-memory work, so
/// contention stays low even with concurrent publishers and readers.
pub struct StatusStore {
    /// Map of status id to record
    records: RwLock<HashMap<StatusId, Status>>,

    /// Next id to assign; never reset, so ids are unique for the process
    next_id: AtomicU64,

    /// Configuration
    config: StoreConfig,

    /// Time source for stamping and liveness checks
    clock: Arc<dyn Clock>,
}

impl StatusStore {
    /// Create a store with default configuration and the system clock
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with custom configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store with custom configuration and time source
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            config,
            clock,
        }
    }

    /// Get the store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create a status record from a draft
    ///
    /// Validates the publisher identity, assigns the id and both timestamps,
    /// and makes the record visible to queries before returning.
    pub async fn create(&self, draft: StatusDraft) -> Result<Status, StoreError> {
        if draft.user_id.trim().is_empty() {
            return Err(StoreError::MissingField("userId"));
        }
        if draft.user_name.trim().is_empty() {
            return Err(StoreError::MissingField("userName"));
        }

        let id = StatusId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let created_at = self.clock.now();
        let status = Status {
            id,
            user_id: draft.user_id,
            user_name: draft.user_name,
            content: draft.content,
            media_url: draft.media_url,
            created_at,
            expires_at: created_at + self.config.ttl,
        };

        let mut records = self.records.write().await;
        records.insert(id, status.clone());

        tracing::debug!(
            status = %id,
            user = %status.user_id,
            expires_at = %status.expires_at,
            "Status created"
        );

        Ok(status)
    }

    /// List all live records, newest first
    ///
    /// Records past their deadline are filtered out even if the sweeper has
    /// not removed them yet. Equal creation timestamps order by id, newest
    /// assigned first.
    pub async fn list_active(&self) -> Vec<Status> {
        let now = self.clock.now();
        let records = self.records.read().await;

        let mut live: Vec<Status> = records
            .values()
            .filter(|s| s.is_live(now))
            .cloned()
            .collect();
        sort_newest_first(&mut live);
        live
    }

    /// List a single user's live records, newest first
    pub async fn list_active_by_user(&self, user_id: &str) -> Vec<Status> {
        let now = self.clock.now();
        let records = self.records.read().await;

        let mut live: Vec<Status> = records
            .values()
            .filter(|s| s.user_id == user_id && s.is_live(now))
            .cloned()
            .collect();
        sort_newest_first(&mut live);
        live
    }

    /// Remove a record by id and return it
    ///
    /// Targets raw existence: an expired record the sweeper has not reached
    /// yet is still removable here.
    pub async fn delete(&self, id: StatusId) -> Result<Status, StoreError> {
        let mut records = self.records.write().await;
        let status = records.remove(&id).ok_or(StoreError::NotFound(id))?;

        tracing::debug!(status = %id, user = %status.user_id, "Status deleted");

        Ok(status)
    }

    /// Remove every record belonging to `user_id`, live or not
    ///
    /// Returns the removed ids in ascending order. Fails if the user has no
    /// records at all.
    pub async fn delete_all_for_user(&self, user_id: &str) -> Result<Vec<StatusId>, StoreError> {
        let mut records = self.records.write().await;

        let mut ids: Vec<StatusId> = records
            .values()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.id)
            .collect();

        if ids.is_empty() {
            return Err(StoreError::NoStatusesForUser(user_id.to_string()));
        }

        for id in &ids {
            records.remove(id);
        }
        ids.sort();

        tracing::info!(user = %user_id, removed = ids.len(), "User statuses deleted");

        Ok(ids)
    }

    /// Remove every record with a deadline at or before `now`
    ///
    /// Returns the removed ids in ascending order, empty if nothing was
    /// due. Physical removal here is memory reclamation; reads are already
    /// correct without it.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<StatusId> {
        let mut records = self.records.write().await;

        let mut expired: Vec<StatusId> = records
            .values()
            .filter(|s| s.expires_at <= now)
            .map(|s| s.id)
            .collect();

        for id in &expired {
            records.remove(id);
        }
        expired.sort();

        if !expired.is_empty() {
            tracing::info!(removed = expired.len(), "Cleaned up expired statuses");
        }

        expired
    }

    /// Total number of records physically present, live or not
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_newest_first(statuses: &mut [Status]) {
    statuses.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
