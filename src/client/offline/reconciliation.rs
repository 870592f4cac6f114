//! # Replay Reconciliation
//!
//! Identifiers created offline are client-generated and unknown to the
//! backend. During one replay pass [`IdMap`] records the server id each
//! create was given, so later queue items that reference the same record
//! are rewritten before they are sent.

use crate::client::api::ApiError;
use crate::client::offline::queue::QueuedOp;
use std::collections::HashMap;

/// Client id to server id translations learned during one replay pass
#[derive(Debug, Default, Clone)]
pub struct IdMap {
    trips: HashMap<String, String>,
    activities: HashMap<String, String>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_trip(&mut self, client_id: &str, server_id: &str) {
        if client_id != server_id {
            self.trips.insert(client_id.to_string(), server_id.to_string());
        }
    }

    pub fn record_activity(&mut self, client_id: &str, server_id: &str) {
        if client_id != server_id {
            self.activities
                .insert(client_id.to_string(), server_id.to_string());
        }
    }

    pub fn trip<'a>(&'a self, id: &'a str) -> &'a str {
        self.trips.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn activity<'a>(&'a self, id: &'a str) -> &'a str {
        self.activities.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty() && self.activities.is_empty()
    }

    /// Rewrite every id embedded in `op`
    pub fn translate(&self, op: &QueuedOp) -> QueuedOp {
        match op {
            QueuedOp::CreateTrip { .. } => op.clone(),
            QueuedOp::UpdateTrip { id, patch } => QueuedOp::UpdateTrip {
                id: self.trip(id).to_string(),
                patch: patch.clone(),
            },
            QueuedOp::DeleteTrip { id } => QueuedOp::DeleteTrip {
                id: self.trip(id).to_string(),
            },
            QueuedOp::CreateActivity { activity } => {
                let mut activity = activity.clone();
                activity.trip_id = self.trip(&activity.trip_id).to_string();
                QueuedOp::CreateActivity { activity }
            }
            QueuedOp::UpdateActivity { id, patch } => QueuedOp::UpdateActivity {
                id: self.activity(id).to_string(),
                patch: patch.clone(),
            },
            QueuedOp::DeleteActivity { id } => QueuedOp::DeleteActivity {
                id: self.activity(id).to_string(),
            },
        }
    }
}

/// Result of one replay pass
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayOutcome {
    /// Every queued item was accepted
    Drained { replayed: usize },
    /// An item failed; it and everything behind it stay queued
    Halted {
        replayed: usize,
        remaining: usize,
        error: ApiError,
    },
    /// Nothing was attempted: local-only, offline, or another replay is running
    Skipped,
}

impl ReplayOutcome {
    pub fn is_drained(&self) -> bool {
        matches!(self, ReplayOutcome::Drained { .. })
    }
}
