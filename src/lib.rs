//! Tripmate - Main Library
//!
//! Tripmate is the client core of a travel-itinerary planner: trips laid out
//! day by day with activities, stays, attractions, flights, shopping lists,
//! documents, expenses and pinned places, shared with other travellers.
//!
//! # Overview
//!
//! This library provides:
//! - An offline-first Trip Store with optimistic updates
//! - A durable queue for trip and activity writes made while offline
//! - A REST client for the backend trip service
//! - Local persistence in SQLite
//!
//! # Module Structure
//!
//! - **`shared`** - Plain data exchanged with the backend
//!   - Trip records, patches and the full snapshot
//!   - Collaboration types (members, invites, share links)
//!   - Error types and validated configuration
//!
//! - **`client`** - The client runtime
//!   - `store`: the Trip Store
//!   - `offline`: queue, rollback policy, id reconciliation
//!   - `api`: backend interface and its HTTP implementation
//!   - `local_db`: on-device key/value storage
//!   - `config`, `auth`, `sync`
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tripmate::client::api::HttpBackend;
//! use tripmate::client::config::Config;
//! use tripmate::client::local_db::SqliteStorage;
//! use tripmate::client::store::TripStore;
//! use tripmate::client::sync::NetworkMonitor;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let storage = Arc::new(SqliteStorage::open_default().await?);
//! let backend = Arc::new(HttpBackend::new(&config));
//! let store = TripStore::with_backend(backend, storage, NetworkMonitor::default()).await?;
//! store.load().await?;
//! for trip in store.trips() {
//!     println!("{} ({} days)", trip.name, trip.day_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for validation and serialization
//! - `client::api::ApiError` for backend calls
//! - `client::local_db::StorageError` for local persistence
//! - `client::store::StoreError` wraps all of the above

/// Shared types and data structures
pub mod shared;

/// Client runtime: store, offline queue, backend client
pub mod client;
