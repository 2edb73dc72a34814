//! Ephemeral status store
//!
//! The store owns the collection of live status records and all mutation on
//! it. Records carry a hard deadline (`expires_at`) fixed at creation time;
//! queries filter on that deadline at call time, so a record that outlived
//! its TTL is invisible to readers even before the sweeper physically
//! removes it.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<StatusStore>
//!                 ┌──────────────────────────┐
//!                 │ records: HashMap<Id,     │
//!                 │   Status {               │
//!                 │     created_at,          │
//!                 │     expires_at,          │
//!                 │   }                      │
//!                 │ >                        │
//!                 └────────────┬─────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!   [Gateway]             [Gateway]             [Sweeper]
//!   create()              list_active()         sweep_expired(now)
//!   delete()                  │                     │
//!        │              filter is_live(now)    remove expires_at <= now
//!        └──► hub.notify(..)                        └──► hub.notify(..)
//! ```
//!
//! # Two notions of "gone"
//!
//! Reads filter by liveness; deletes target raw existence. An explicit
//! delete of an expired-but-unswept record still succeeds and still reports
//! the record, while a concurrent `list_active` call never returns it.

pub mod config;
pub mod error;
pub mod record;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use record::{Status, StatusDraft, StatusId};
pub use store::StatusStore;
