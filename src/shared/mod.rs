//! Shared Module
//!
//! This module contains the types exchanged with the trip backend and
//! persisted on the device. Everything here is plain data: no I/O, no
//! async, no global state.
//!
//! # Overview
//!
//! - `itinerary` - trips and every record that belongs to a trip
//! - `error` - validation and serialization errors
//! - `config` - validated application configuration

/// Trip records and collaboration types
pub mod itinerary;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, SyncMode};
pub use itinerary::{EntityKind, Snapshot, Trip, TripEntity, TripRole};
