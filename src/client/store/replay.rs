//! Offline queue replay and connectivity handling.

use super::{StoreResult, TripStore};
use crate::client::api::{ApiResult, TripBackend};
use crate::client::offline::{IdMap, QueuedOp, ReplayOutcome};
use crate::shared::itinerary::Activity;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// When a drained queue is followed by a snapshot fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Refresh {
    Always,
    /// The caller has just fetched; only refetch if something was sent
    IfReplayed,
}

impl<B: TripBackend> TripStore<B> {
    /// Send queued operations head to tail.
    ///
    /// Each accepted item is removed and the shrunk queue persisted before
    /// the next one is sent. Server ids learned along the way are written
    /// into the items still waiting. The first failure stops the pass and
    /// leaves that item at the head. After a full drain the snapshot is
    /// fetched again, even when the queue was empty, so changes made by
    /// other members while this device was away show up.
    pub async fn replay_queue(&self) -> StoreResult<ReplayOutcome> {
        self.replay(Refresh::Always).await
    }

    pub(super) async fn replay(&self, refresh: Refresh) -> StoreResult<ReplayOutcome> {
        let Some(backend) = self.inner.backend.clone() else {
            return Ok(ReplayOutcome::Skipped);
        };
        if !self.is_online() {
            return Ok(ReplayOutcome::Skipped);
        }
        let Ok(_replaying) = self.inner.replay_lock.try_lock() else {
            tracing::debug!("Queue replay already running");
            return Ok(ReplayOutcome::Skipped);
        };

        let mut ids = IdMap::new();
        let mut replayed = 0;
        loop {
            let head = self.inner.queue.lock().await.front().cloned();
            let Some(item) = head else {
                break;
            };

            let op = item.operation.clone();
            tracing::debug!(op = op.name(), item_id = %item.id, "Replaying queued operation");
            if let Err(error) = self.replay_one(backend.as_ref(), op, &mut ids).await {
                let queue = self.inner.queue.lock().await;
                queue.persist(self.inner.storage.as_ref()).await?;
                let remaining = queue.len();
                tracing::warn!(replayed, remaining, "Queue replay halted: {}", error);
                return Ok(ReplayOutcome::Halted {
                    replayed,
                    remaining,
                    error,
                });
            }

            let mut queue = self.inner.queue.lock().await;
            queue.complete(&item.id);
            if !ids.is_empty() {
                queue.rewrite(|op| ids.translate(op));
            }
            queue.persist(self.inner.storage.as_ref()).await?;
            replayed += 1;
        }

        if replayed > 0 {
            tracing::info!(replayed, "Offline queue drained");
        }
        if replayed > 0 || refresh == Refresh::Always {
            match backend.fetch_state().await {
                Ok(snapshot) => self.inner.write_state().replace_all(snapshot),
                Err(e) => tracing::warn!("Refresh after replay failed: {}", e),
            }
        }
        Ok(ReplayOutcome::Drained { replayed })
    }

    /// Execute one translated operation and record any server-assigned id
    async fn replay_one(&self, backend: &B, op: QueuedOp, ids: &mut IdMap) -> ApiResult<()> {
        match op {
            QueuedOp::CreateTrip {
                optimistic_id,
                input,
            } => {
                let server = backend.create_trip(&input).await?;
                ids.record_trip(&optimistic_id, &server.id);
                // Later queued edits to this trip are already applied locally
                self.inner.write_state().adopt_trip(&optimistic_id, server);
            }
            QueuedOp::UpdateTrip { id, patch } => {
                backend.update_trip(&id, &patch).await?;
            }
            QueuedOp::DeleteTrip { id } => {
                backend.delete_trip(&id).await?;
            }
            QueuedOp::CreateActivity { activity } => {
                let server = backend
                    .create_entity::<Activity>(&activity.trip_id, &activity)
                    .await?;
                ids.record_activity(&activity.id, &server.id);
                self.inner
                    .write_state()
                    .adopt_id::<Activity>(&activity.id, &server.id);
            }
            QueuedOp::UpdateActivity { id, patch } => {
                backend.update_entity::<Activity>(&id, &patch).await?;
            }
            QueuedOp::DeleteActivity { id } => {
                backend.delete_entity::<Activity>(&id).await?;
            }
        }
        Ok(())
    }

    /// Report connectivity. Coming back online replays the queue.
    pub async fn set_online(&self, online: bool) -> StoreResult<ReplayOutcome> {
        let was_online = self.inner.network.set_online(online);
        if online && !was_online {
            self.replay_queue().await
        } else {
            Ok(ReplayOutcome::Skipped)
        }
    }

    /// Replay the queue whenever someone else reports an offline to online
    /// transition on the shared [`NetworkMonitor`](crate::client::sync::NetworkMonitor).
    ///
    /// The task ends when the store is dropped.
    pub fn spawn_connectivity_watcher(&self) -> JoinHandle<()> {
        let mut status = self.inner.network.subscribe();
        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut was_online = *status.borrow_and_update();
            while status.changed().await.is_ok() {
                let online = *status.borrow_and_update();
                if online && !was_online {
                    let Some(inner) = inner.upgrade() else {
                        break;
                    };
                    let store = TripStore { inner };
                    match store.replay_queue().await {
                        Ok(outcome) => tracing::debug!(?outcome, "Reconnect replay finished"),
                        Err(e) => tracing::error!("Reconnect replay failed: {}", e),
                    }
                }
                was_online = online;
            }
        })
    }
}
