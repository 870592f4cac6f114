//! # Offline Mutation Queue
//!
//! Durable FIFO log of writes made while the backend is unreachable.
//!
//! ## Features
//!
//! - **Persistent Queue**: serialized under [`QUEUE_KEY`] after every change,
//!   so operations survive restarts
//! - **Strict Ordering**: items leave the queue head-first, only after the
//!   backend accepted them
//! - **Fixed Operation Set**: trip and activity create/update/delete
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tripmate::client::local_db::MemoryStorage;
//! use tripmate::client::offline::{OfflineQueue, QueuedOp};
//!
//! # async fn demo() -> Result<(), tripmate::client::local_db::StorageError> {
//! let storage = MemoryStorage::new();
//! let mut queue = OfflineQueue::load(&storage).await?;
//! queue.push(QueuedOp::DeleteTrip { id: "t1".into() });
//! queue.persist(&storage).await?;
//! # Ok(())
//! # }
//! ```

use crate::client::local_db::{self, LocalStorage, QUEUE_KEY};
use crate::shared::itinerary::{Activity, ActivityPatch, EntityKind, NewTrip, TripPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Kinds whose writes are queued while offline
pub const QUEUEABLE_KINDS: [EntityKind; 2] = [EntityKind::Trip, EntityKind::Activity];

/// Operation types that can be queued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum QueuedOp {
    /// Create a trip; `optimistic_id` is the client id already in use locally
    CreateTrip { optimistic_id: String, input: NewTrip },
    UpdateTrip { id: String, patch: TripPatch },
    DeleteTrip { id: String },
    /// Create an activity; carries the full optimistic record
    CreateActivity { activity: Activity },
    UpdateActivity { id: String, patch: ActivityPatch },
    DeleteActivity { id: String },
}

impl QueuedOp {
    pub fn kind(&self) -> EntityKind {
        match self {
            QueuedOp::CreateTrip { .. } | QueuedOp::UpdateTrip { .. } | QueuedOp::DeleteTrip { .. } => {
                EntityKind::Trip
            }
            QueuedOp::CreateActivity { .. }
            | QueuedOp::UpdateActivity { .. }
            | QueuedOp::DeleteActivity { .. } => EntityKind::Activity,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            QueuedOp::CreateTrip { .. } => "createTrip",
            QueuedOp::UpdateTrip { .. } => "updateTrip",
            QueuedOp::DeleteTrip { .. } => "deleteTrip",
            QueuedOp::CreateActivity { .. } => "createActivity",
            QueuedOp::UpdateActivity { .. } => "updateActivity",
            QueuedOp::DeleteActivity { .. } => "deleteActivity",
        }
    }
}

/// Queued operation with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Queue entry ID
    pub id: String,
    /// Operation details
    pub operation: QueuedOp,
    /// Timestamp when queued
    pub queued_at: DateTime<Utc>,
}

/// FIFO queue of offline operations
#[derive(Debug, Default)]
pub struct OfflineQueue {
    items: VecDeque<QueueItem>,
}

impl OfflineQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the queue persisted in `storage`, or start empty
    pub async fn load(storage: &dyn LocalStorage) -> local_db::Result<Self> {
        let items: Option<VecDeque<QueueItem>> = local_db::read_json(storage, QUEUE_KEY).await?;
        let queue = Self {
            items: items.unwrap_or_default(),
        };
        if !queue.is_empty() {
            tracing::info!("Restored {} queued offline operations", queue.len());
        }
        Ok(queue)
    }

    /// Write the current contents to `storage`
    pub async fn persist(&self, storage: &dyn LocalStorage) -> local_db::Result<()> {
        local_db::write_json(storage, QUEUE_KEY, &self.items).await
    }

    /// Append an operation to the tail
    pub fn push(&mut self, operation: QueuedOp) -> &QueueItem {
        tracing::debug!(op = operation.name(), "Queued offline operation");
        self.items.push_back(QueueItem {
            id: Uuid::new_v4().to_string(),
            operation,
            queued_at: Utc::now(),
        });
        &self.items[self.items.len() - 1]
    }

    /// Oldest pending item
    pub fn front(&self) -> Option<&QueueItem> {
        self.items.front()
    }

    /// Drop the head if it is `item_id`
    pub fn complete(&mut self, item_id: &str) -> Option<QueueItem> {
        match self.items.front() {
            Some(head) if head.id == item_id => self.items.pop_front(),
            _ => None,
        }
    }

    /// Rewrite every pending operation in place, keeping ids and order
    pub fn rewrite(&mut self, mut f: impl FnMut(&QueuedOp) -> QueuedOp) {
        for item in self.items.iter_mut() {
            item.operation = f(&item.operation);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the pending items, head first
    pub fn items(&self) -> Vec<QueueItem> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::local_db::MemoryStorage;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn new_trip() -> NewTrip {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        NewTrip::new("Lisbon", start, start)
    }

    #[test]
    fn test_wire_shape() {
        let op = QueuedOp::CreateTrip {
            optimistic_id: "tmp-1".into(),
            input: new_trip(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "createTrip");
        assert_eq!(json["payload"]["optimisticId"], "tmp-1");
        assert_eq!(json["payload"]["input"]["name"], "Lisbon");
    }

    #[test]
    fn test_fifo_order_and_completion() {
        let mut queue = OfflineQueue::new();
        let first = queue.push(QueuedOp::DeleteTrip { id: "a".into() }).id.clone();
        let second = queue.push(QueuedOp::DeleteTrip { id: "b".into() }).id.clone();

        // Only the head can be completed
        assert!(queue.complete(&second).is_none());
        assert_eq!(queue.complete(&first).unwrap().operation, QueuedOp::DeleteTrip { id: "a".into() });
        assert_eq!(queue.front().unwrap().id, second);
    }

    #[test]
    fn test_rewrite_keeps_ids_and_order() {
        let mut queue = OfflineQueue::new();
        let first = queue.push(QueuedOp::DeleteTrip { id: "tmp-1".into() }).id.clone();
        queue.push(QueuedOp::DeleteActivity { id: "a1".into() });

        queue.rewrite(|op| match op {
            QueuedOp::DeleteTrip { .. } => QueuedOp::DeleteTrip { id: "srv-1".into() },
            other => other.clone(),
        });

        let items = queue.items();
        assert_eq!(items[0].id, first);
        assert_eq!(items[0].operation, QueuedOp::DeleteTrip { id: "srv-1".into() });
        assert_eq!(items[1].operation, QueuedOp::DeleteActivity { id: "a1".into() });
    }

    #[test]
    fn test_kinds_are_queueable() {
        let op = QueuedOp::DeleteActivity { id: "a1".into() };
        assert_eq!(op.kind(), EntityKind::Activity);
        assert!(QUEUEABLE_KINDS.contains(&op.kind()));
        assert!(!QUEUEABLE_KINDS.contains(&EntityKind::Expense));
    }

    #[tokio::test]
    async fn test_persist_and_reload() {
        let storage = MemoryStorage::new();
        let mut queue = OfflineQueue::load(&storage).await.unwrap();
        assert!(queue.is_empty());

        queue.push(QueuedOp::CreateTrip {
            optimistic_id: "tmp-1".into(),
            input: new_trip(),
        });
        queue.push(QueuedOp::UpdateTrip {
            id: "tmp-1".into(),
            patch: TripPatch {
                name: Some("Porto".into()),
                ..Default::default()
            },
        });
        queue.persist(&storage).await.unwrap();

        let restored = OfflineQueue::load(&storage).await.unwrap();
        assert_eq!(restored.items(), queue.items());
    }
}
