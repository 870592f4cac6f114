//! Store fixtures
//!
//! A [`Harness`] bundles an API-backed store with the mock backend, the
//! in-memory storage and the network monitor behind it, so tests can flip
//! connectivity and reopen the store over the same storage.

use super::mock_backend::{MockBackend, MOCK_USER};
use chrono::NaiveDate;
use std::sync::Arc;
use tripmate::client::local_db::{LocalStorage, MemoryStorage};
use tripmate::client::offline::{ReplayOutcome, RollbackPolicy};
use tripmate::client::store::TripStore;
use tripmate::client::sync::NetworkMonitor;
use tripmate::shared::itinerary::NewTrip;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Three-day trip, 2025-06-01 to 2025-06-03
pub fn lisbon() -> NewTrip {
    NewTrip::new("Lisbon", date("2025-06-01"), date("2025-06-03"))
}

/// Local-only store over `storage`
pub async fn local_store(storage: Arc<MemoryStorage>) -> TripStore {
    TripStore::local_only(storage as Arc<dyn LocalStorage>)
        .await
        .unwrap()
}

pub struct Harness {
    pub store: TripStore<MockBackend>,
    pub backend: Arc<MockBackend>,
    pub storage: Arc<MemoryStorage>,
    pub network: NetworkMonitor,
}

impl Harness {
    /// Online store with the initial snapshot loaded
    pub async fn online() -> Self {
        let harness = Self::open(
            Arc::new(MockBackend::new()),
            Arc::new(MemoryStorage::new()),
            NetworkMonitor::new(true),
            RollbackPolicy::default(),
        )
        .await;
        harness.store.load().await.unwrap();
        harness
    }

    /// Store that has lost connectivity before loading anything
    pub async fn offline() -> Self {
        let harness = Self::open(
            Arc::new(MockBackend::new()),
            Arc::new(MemoryStorage::new()),
            NetworkMonitor::new(false),
            RollbackPolicy::default(),
        )
        .await;
        harness.backend.set_reachable(false);
        harness
    }

    pub async fn open(
        backend: Arc<MockBackend>,
        storage: Arc<MemoryStorage>,
        network: NetworkMonitor,
        policy: RollbackPolicy,
    ) -> Self {
        let store = TripStore::open(
            Some(Arc::clone(&backend)),
            Arc::clone(&storage) as Arc<dyn LocalStorage>,
            network.clone(),
            policy,
        )
        .await
        .unwrap();
        store.set_current_user(Some(MOCK_USER.to_string()));
        Self {
            store,
            backend,
            storage,
            network,
        }
    }

    /// A second store over the same backend, storage and network, as after
    /// an app restart
    pub async fn reopen(&self) -> Self {
        Self::open(
            Arc::clone(&self.backend),
            Arc::clone(&self.storage),
            self.network.clone(),
            RollbackPolicy::default(),
        )
        .await
    }

    /// Restore the connection and report it to the store
    pub async fn reconnect(&self) -> ReplayOutcome {
        self.backend.set_reachable(true);
        self.store.set_online(true).await.unwrap()
    }

    pub async fn disconnect(&self) {
        self.backend.set_reachable(false);
        self.store.set_online(false).await.unwrap();
    }
}
