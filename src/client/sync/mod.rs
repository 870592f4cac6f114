//! # Sync Module
//!
//! Connectivity tracking used to decide between sending a write and
//! queueing it.

pub mod network_monitor;

pub use network_monitor::{NetworkMonitor, NetworkStatus};
