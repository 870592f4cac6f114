//! # Trip Store
//!
//! The single source of truth for trip data on the client. Every read goes
//! through the in-memory collections; every write is applied there first and
//! then, depending on the mode, persisted to local storage, sent to the
//! backend, or queued until the backend is reachable again.
//!
//! ## Modes
//!
//! - **Local-only**: no backend; every mutation rewrites the state blob in
//!   [`LocalStorage`]
//! - **API-backed**: mutations are sent to a [`TripBackend`]; trip and
//!   activity writes made while offline go to the [`OfflineQueue`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tripmate::client::local_db::MemoryStorage;
//! use tripmate::client::store::TripStore;
//! use tripmate::shared::itinerary::{NewActivity, NewTrip};
//! use chrono::NaiveDate;
//!
//! # async fn demo() -> Result<(), tripmate::client::store::StoreError> {
//! let store = TripStore::local_only(Arc::new(MemoryStorage::new())).await?;
//! let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let trip = store.add_trip(NewTrip::new("Lisbon", start, start)).await?;
//! store.add_activity(NewActivity::new(&trip.id, 0, "Tram 28")).await?;
//! assert_eq!(store.activities_for_day(&trip.id, 0).len(), 1);
//! # Ok(())
//! # }
//! ```

mod collab;
mod mutations;
mod replay;
mod state;

use crate::client::api::{ApiError, ApiResult, HttpBackend, TripBackend};
use crate::client::local_db::{self, LocalStorage, StorageError, STATE_KEY};
use crate::client::offline::{OfflineQueue, QueueItem, QueuedOp, RollbackPolicy, QUEUEABLE_KINDS};
use crate::client::sync::NetworkMonitor;
use crate::shared::error::SharedError;
use crate::shared::itinerary::{
    Accommodation, Activity, Attraction, Day, Document, EntityPatch, Expense, Flight,
    PinnedPlace, ShoppingItem, Snapshot, Trip, TripEntity,
};
use replay::Refresh;
use state::{Collection, TripState};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tokio::task::JoinSet;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before any change was applied, or a missing record
    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The current user may view but not change this trip
    #[error("Trip '{0}' is read-only for the current user")]
    ReadOnly(String),

    /// The operation needs a backend but the store is local-only
    #[error("No backend configured")]
    LocalOnly,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Progress of the initial snapshot fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The fetch failed; whatever was already in memory is kept
    Failed,
}

/// How a write leaves the device
enum Dispatch<B> {
    /// Local-only mode: rewrite the state blob
    Persist,
    /// API-backed but offline
    Queue(QueuedOp),
    Send(Arc<B>),
}

struct StoreInner<B> {
    state: RwLock<TripState>,
    load_state: RwLock<LoadState>,
    queue: tokio::sync::Mutex<OfflineQueue>,
    /// Held for the duration of one replay pass
    replay_lock: tokio::sync::Mutex<()>,
    backend: Option<Arc<B>>,
    storage: Arc<dyn LocalStorage>,
    network: NetworkMonitor,
    policy: RollbackPolicy,
    tasks: std::sync::Mutex<JoinSet<()>>,
    user_id: RwLock<Option<String>>,
}

/// Handle to the trip store. Clones share the same state.
pub struct TripStore<B: TripBackend = HttpBackend> {
    inner: Arc<StoreInner<B>>,
}

impl<B: TripBackend> Clone for TripStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl TripStore<HttpBackend> {
    /// Store without a backend, persisted to `storage`
    pub async fn local_only(storage: Arc<dyn LocalStorage>) -> StoreResult<Self> {
        Self::open(None, storage, NetworkMonitor::default(), RollbackPolicy::default()).await
    }
}

impl<B: TripBackend> TripStore<B> {
    /// API-backed store with the default rollback policy
    pub async fn with_backend(
        backend: Arc<B>,
        storage: Arc<dyn LocalStorage>,
        network: NetworkMonitor,
    ) -> StoreResult<Self> {
        Self::open(Some(backend), storage, network, RollbackPolicy::default()).await
    }

    /// Open a store, restoring the offline queue (and, without a backend,
    /// the persisted collections) from `storage`
    pub async fn open(
        backend: Option<Arc<B>>,
        storage: Arc<dyn LocalStorage>,
        network: NetworkMonitor,
        policy: RollbackPolicy,
    ) -> StoreResult<Self> {
        let queue = OfflineQueue::load(storage.as_ref()).await?;

        let store = Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(TripState::default()),
                load_state: RwLock::new(LoadState::Idle),
                queue: tokio::sync::Mutex::new(queue),
                replay_lock: tokio::sync::Mutex::new(()),
                backend,
                storage,
                network,
                policy,
                tasks: std::sync::Mutex::new(JoinSet::new()),
                user_id: RwLock::new(None),
            }),
        };

        if !store.is_api_backed() {
            store.restore_local().await?;
        }
        Ok(store)
    }

    /// Fetch the full snapshot and replace every collection, then drain the
    /// offline queue.
    ///
    /// On fetch failure the load state becomes [`LoadState::Failed`] and the
    /// collections already in memory are kept. There is no automatic retry.
    pub async fn load(&self) -> StoreResult<()> {
        let Some(backend) = self.inner.backend.clone() else {
            return self.restore_local().await;
        };

        self.inner.set_load_state(LoadState::Loading);
        match backend.fetch_state().await {
            Ok(snapshot) => {
                tracing::info!(
                    trips = snapshot.trips.len(),
                    records = snapshot.record_count(),
                    "Loaded trip snapshot"
                );
                self.inner.write_state().replace_all(snapshot);
                self.inner.set_load_state(LoadState::Ready);
            }
            Err(e) => {
                tracing::warn!("Failed to load trip snapshot: {}", e);
                self.inner.set_load_state(LoadState::Failed);
                return Err(e.into());
            }
        }

        match self.replay(Refresh::IfReplayed).await {
            Ok(outcome) => tracing::debug!(?outcome, "Post-load queue replay finished"),
            Err(e) => tracing::error!("Post-load queue replay failed: {}", e),
        }
        Ok(())
    }

    async fn restore_local(&self) -> StoreResult<()> {
        let restored: Option<Snapshot> =
            local_db::read_json(self.inner.storage.as_ref(), STATE_KEY).await?;
        if let Some(snapshot) = restored {
            tracing::info!(trips = snapshot.trips.len(), "Restored local trip data");
            self.inner.write_state().replace_all(snapshot);
        }
        self.inner.set_load_state(LoadState::Ready);
        Ok(())
    }

    /// Wait for every in-flight backend request to finish
    pub async fn settle(&self) {
        loop {
            let mut tasks = {
                let mut guard = self.inner.tasks.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *guard)
            };
            if tasks.is_empty() {
                return;
            }
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    tracing::error!("Background sync task failed: {}", e);
                }
            }
        }
    }

    /// Identify the signed-in user; used as owner of locally created trips
    /// and to detect leaving a trip
    pub fn set_current_user(&self, user_id: Option<String>) {
        *self
            .inner
            .user_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = user_id;
    }

    pub fn current_user(&self) -> Option<String> {
        self.inner
            .user_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_api_backed(&self) -> bool {
        self.inner.backend.is_some()
    }

    pub fn is_online(&self) -> bool {
        self.inner.network.is_online()
    }

    pub fn network(&self) -> &NetworkMonitor {
        &self.inner.network
    }

    pub fn load_state(&self) -> LoadState {
        *self
            .inner
            .load_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Operations waiting for connectivity, oldest first
    pub async fn pending_operations(&self) -> Vec<QueueItem> {
        self.inner.queue.lock().await.items()
    }

    // ---- read accessors ----

    /// Copy of every collection
    pub fn snapshot(&self) -> Snapshot {
        self.inner.read_state().snapshot()
    }

    pub fn trips(&self) -> Vec<Trip> {
        self.inner.read_state().trips().to_vec()
    }

    pub fn trip(&self, id: &str) -> Option<Trip> {
        self.inner.read_state().trip(id).cloned()
    }

    /// Day sequence of a trip; empty when the trip is unknown
    pub fn days(&self, trip_id: &str) -> Vec<Day> {
        self.inner.read_state().days(trip_id)
    }

    pub fn activities_for_trip(&self, trip_id: &str) -> Vec<Activity> {
        self.inner.read_state().for_trip(trip_id)
    }

    /// Activities of one day, ascending by `order`
    pub fn activities_for_day(&self, trip_id: &str, day_index: u32) -> Vec<Activity> {
        self.inner.read_state().activities_for_day(trip_id, day_index)
    }

    pub fn accommodations_for_trip(&self, trip_id: &str) -> Vec<Accommodation> {
        self.inner.read_state().for_trip(trip_id)
    }

    /// The stay covering a day; with overlapping stays the first inserted wins
    pub fn accommodation_for_day(&self, trip_id: &str, day_index: u32) -> Option<Accommodation> {
        self.inner.read_state().accommodation_for_day(trip_id, day_index)
    }

    pub fn attractions_for_trip(&self, trip_id: &str) -> Vec<Attraction> {
        self.inner.read_state().for_trip(trip_id)
    }

    pub fn attractions_for_day(&self, trip_id: &str, day_index: u32) -> Vec<Attraction> {
        self.inner.read_state().attractions_for_day(trip_id, day_index)
    }

    /// Shopping list, ascending by `order`
    pub fn shopping_items_for_trip(&self, trip_id: &str) -> Vec<ShoppingItem> {
        self.inner.read_state().shopping_items_for_trip(trip_id)
    }

    pub fn documents_for_trip(&self, trip_id: &str) -> Vec<Document> {
        self.inner.read_state().for_trip(trip_id)
    }

    pub fn expenses_for_trip(&self, trip_id: &str) -> Vec<Expense> {
        self.inner.read_state().for_trip(trip_id)
    }

    pub fn expense_total(&self, trip_id: &str) -> f64 {
        self.inner.read_state().expense_total(trip_id)
    }

    pub fn pinned_places_for_trip(&self, trip_id: &str) -> Vec<PinnedPlace> {
        self.inner.read_state().for_trip(trip_id)
    }

    pub fn flights_for_trip(&self, trip_id: &str) -> Vec<Flight> {
        self.inner.read_state().for_trip(trip_id)
    }

    // ---- write plumbing ----

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(task);
    }

    fn dispatch(&self, queued: Option<QueuedOp>) -> Dispatch<B> {
        match &self.inner.backend {
            None => Dispatch::Persist,
            Some(backend) => match queued {
                Some(op) if !self.is_online() && QUEUEABLE_KINDS.contains(&op.kind()) => {
                    Dispatch::Queue(op)
                }
                _ => Dispatch::Send(Arc::clone(backend)),
            },
        }
    }

    /// Reject writes to unknown trips and trips the user may only view
    fn ensure_editable(&self, trip_id: &str) -> StoreResult<()> {
        let state = self.inner.read_state();
        match state.trip(trip_id) {
            None => Err(SharedError::not_found("trip", trip_id).into()),
            Some(trip) if !trip.can_edit() => Err(StoreError::ReadOnly(trip_id.to_string())),
            Some(_) => Ok(()),
        }
    }

    /// Finish a write that was already applied in memory
    async fn commit(&self, queued: Option<QueuedOp>, send: impl FnOnce(&Self, Arc<B>)) {
        match self.dispatch(queued) {
            Dispatch::Persist => self.inner.persist_local().await,
            Dispatch::Queue(op) => self.inner.enqueue(op).await,
            Dispatch::Send(backend) => send(self, backend),
        }
    }

    /// Insert an optimistic record and sync it in the background
    async fn create_record<E: TripEntity>(
        &self,
        record: E,
        queued: Option<QueuedOp>,
    ) -> StoreResult<E>
    where
        TripState: Collection<E>,
    {
        self.ensure_editable(record.trip_id())?;
        record.validate()?;
        self.inner.write_state().insert(record.clone());

        let optimistic = record.clone();
        self.commit(queued, move |store, backend| {
            let inner = Arc::clone(&store.inner);
            store.spawn(async move {
                let _ = inner.sync_create(backend, optimistic).await;
            });
        })
        .await;
        Ok(record)
    }

    /// Merge a patch into an existing record and sync it in the background
    async fn update_record<E: TripEntity>(
        &self,
        id: &str,
        patch: E::Patch,
        queued: Option<QueuedOp>,
    ) -> StoreResult<()>
    where
        TripState: Collection<E>,
    {
        let trip_id = self
            .inner
            .read_state()
            .get::<E>(id)
            .map(|record| record.trip_id().to_string())
            .ok_or_else(|| SharedError::not_found(E::KIND.as_str(), id))?;
        self.ensure_editable(&trip_id)?;

        {
            let mut state = self.inner.write_state();
            let record = state
                .get_mut::<E>(id)
                .ok_or_else(|| SharedError::not_found(E::KIND.as_str(), id))?;
            let mut updated = record.clone();
            patch.apply_to(&mut updated);
            updated.validate()?;
            *record = updated;
        }

        let id = id.to_string();
        self.commit(queued, move |store, backend| {
            let inner = Arc::clone(&store.inner);
            store.spawn(async move {
                match backend.update_entity::<E>(&id, &patch).await {
                    Ok(server) => {
                        inner.write_state().replace(&id, server);
                    }
                    Err(e) => tracing::warn!(kind = %E::KIND, id = %id, "Update not synced: {}", e),
                }
            });
        })
        .await;
        Ok(())
    }

    /// Remove a record immediately; unknown ids are a no-op
    async fn delete_record<E: TripEntity>(
        &self,
        id: &str,
        queued: Option<QueuedOp>,
    ) -> StoreResult<()>
    where
        TripState: Collection<E>,
    {
        let trip_id = match self.inner.read_state().get::<E>(id) {
            Some(record) => record.trip_id().to_string(),
            None => return Ok(()),
        };
        self.ensure_editable(&trip_id)?;
        self.inner.write_state().remove::<E>(id);

        let id = id.to_string();
        self.commit(queued, move |store, backend| {
            store.spawn(async move {
                if let Err(e) = backend.delete_entity::<E>(&id).await {
                    tracing::warn!(kind = %E::KIND, id = %id, "Delete not synced: {}", e);
                }
            });
        })
        .await;
        Ok(())
    }
}

impl<B: TripBackend> StoreInner<B> {
    fn read_state(&self) -> RwLockReadGuard<'_, TripState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TripState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_load_state(&self, load_state: LoadState) {
        *self
            .load_state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = load_state;
    }

    /// Rewrite the state blob; local-only mode
    async fn persist_local(&self) {
        let snapshot = self.read_state().persisted();
        if let Err(e) = local_db::write_json(self.storage.as_ref(), STATE_KEY, &snapshot).await {
            tracing::error!("Failed to persist trip data: {}", e);
        }
    }

    async fn enqueue(&self, op: QueuedOp) {
        let mut queue = self.queue.lock().await;
        queue.push(op);
        if let Err(e) = queue.persist(self.storage.as_ref()).await {
            tracing::error!("Failed to persist offline queue: {}", e);
        }
    }

    /// Send an optimistic create and reconcile the response
    async fn sync_create<E: TripEntity>(&self, backend: Arc<B>, optimistic: E) -> ApiResult<E>
    where
        TripState: Collection<E>,
    {
        match backend.create_entity(optimistic.trip_id(), &optimistic).await {
            Ok(server) => {
                self.write_state().replace(optimistic.id(), server.clone());
                Ok(server)
            }
            Err(e) => {
                if self.policy.rollback_on_failure(E::KIND) {
                    self.write_state().remove::<E>(optimistic.id());
                    tracing::warn!(kind = %E::KIND, id = %optimistic.id(), "Create failed, rolled back: {}", e);
                } else {
                    tracing::warn!(kind = %E::KIND, id = %optimistic.id(), "Create failed, keeping local record: {}", e);
                }
                Err(e)
            }
        }
    }
}
