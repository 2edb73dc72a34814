//! Broadcast hub for subscriber fan-out
//!
//! The hub tracks the current membership of a single broadcast group and
//! delivers typed events to every member. Membership is an explicit id set
//! rather than a framework primitive, so it could be swapped for a pub/sub
//! topic abstraction without touching the store.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<BroadcastHub>
//!                  ┌───────────────────────────┐
//!                  │ connections: HashMap<Id,  │
//!                  │   mpsc::Sender<Arc<Event>>│
//!                  │ >                         │
//!                  │ members: HashSet<Id>      │
//!                  └────────────┬──────────────┘
//!                               │ notify(event)
//!          ┌────────────────────┼────────────────────┐
//!          │                    │                    │
//!          ▼                    ▼                    ▼
//!    [Subscription]       [Subscription]       [Subscription]
//!    recv()               recv()               recv()
//! ```
//!
//! # Delivery model
//!
//! Fan-out is fire-and-forget per member over unbounded channels: a send
//! never blocks, a member whose receiver is gone is skipped and pruned, and
//! no failure reaches the caller. Events are wrapped in `Arc`, so all
//! members share one allocation per event. Events issued by a single caller
//! reach each member in issue order; there is no cross-member ordering.

pub mod event;
pub mod hub;
pub mod subscriber;

pub use event::{Event, ViewedReceipt};
pub use hub::BroadcastHub;
pub use subscriber::{ConnectionId, Subscription};
