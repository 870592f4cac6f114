//! Client Module
//!
//! Everything that runs on the traveller's device.
//!
//! - `store` - the Trip Store, single source of truth for trip data
//! - `offline` - offline queue, rollback policy and replay reconciliation
//! - `api` - backend interface and the `reqwest` client
//! - `local_db` - SQLite and in-memory key/value storage
//! - `sync` - network connectivity monitor
//! - `config` - configuration from file and environment
//! - `auth` / `types` - login and registration

pub mod api;
pub mod auth;
pub mod config;
pub mod local_db;
pub mod offline;
pub mod store;
pub mod sync;
pub mod types;

pub use api::{ApiError, HttpBackend, TripBackend};
pub use config::Config;
pub use store::{LoadState, StoreError, TripStore};
