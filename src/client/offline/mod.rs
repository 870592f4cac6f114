//! # Offline Support
//!
//! Provides the pieces the Trip Store uses to stay usable without a
//! connection: optimistic updates with a per-kind failure policy, a durable
//! operation queue, and id reconciliation during replay.
//!
//! ## Key Components
//!
//! - `optimistic.rs`: rollback policy for failed optimistic creates
//! - `queue.rs`: persisted FIFO of offline operations
//! - `reconciliation.rs`: client/server id translation and replay outcomes
//!
//! Replay itself lives on [`TripStore::replay_queue`](crate::client::store::TripStore::replay_queue),
//! which owns the state the queue items refer to.

pub mod optimistic;
pub mod queue;
pub mod reconciliation;

// Re-export main types
pub use optimistic::RollbackPolicy;
pub use queue::{OfflineQueue, QueueItem, QueuedOp, QUEUEABLE_KINDS};
pub use reconciliation::{IdMap, ReplayOutcome};
