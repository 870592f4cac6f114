//! # Optimistic Update Policy
//!
//! Every mutation is applied locally before the backend answers. When a
//! create request fails, [`RollbackPolicy`] decides whether the optimistic
//! record stays visible or is removed again.

use crate::shared::itinerary::EntityKind;
use std::collections::HashMap;

/// Per-kind failure handling for optimistic creates
#[derive(Debug, Clone)]
pub struct RollbackPolicy {
    rollback_on_failure: HashMap<EntityKind, bool>,
}

impl Default for RollbackPolicy {
    fn default() -> Self {
        let mut rollback_on_failure: HashMap<EntityKind, bool> =
            EntityKind::ALL.iter().map(|kind| (*kind, false)).collect();
        // A pin that never reached the server is misleading on the map
        rollback_on_failure.insert(EntityKind::PinnedPlace, true);
        Self {
            rollback_on_failure,
        }
    }
}

impl RollbackPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep every optimistic record regardless of outcome
    pub fn keep_all() -> Self {
        Self {
            rollback_on_failure: EntityKind::ALL.iter().map(|kind| (*kind, false)).collect(),
        }
    }

    /// Override the rule for one kind
    pub fn with(mut self, kind: EntityKind, rollback: bool) -> Self {
        self.rollback_on_failure.insert(kind, rollback);
        self
    }

    /// Whether a failed create of `kind` removes the optimistic record
    pub fn rollback_on_failure(&self, kind: EntityKind) -> bool {
        self.rollback_on_failure.get(&kind).copied().unwrap_or(false)
    }
}
