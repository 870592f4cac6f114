//! # Network Monitor
//!
//! Tracks whether the backend is currently reachable.
//!
//! ## Features
//!
//! - **Connectivity Detection**: online/offline flag shared by every clone
//! - **Real-time Updates**: transitions are broadcast over a `watch` channel
//!
//! The monitor does not probe the network itself; whoever observes
//! connectivity (the platform, a failed request, a user toggle) reports it
//! through [`NetworkMonitor::set_online`].

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

/// Shared online/offline flag
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    status: Arc<watch::Sender<bool>>,
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkMonitor {
    pub fn new(online: bool) -> Self {
        let (status, _) = watch::channel(online);
        Self {
            status: Arc::new(status),
        }
    }

    pub fn is_online(&self) -> bool {
        *self.status.borrow()
    }

    pub fn get_status(&self) -> NetworkStatus {
        if self.is_online() {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        }
    }

    /// Record the current connectivity; returns the previous value
    pub fn set_online(&self, online: bool) -> bool {
        let previous = self.status.send_replace(online);
        if previous != online {
            tracing::info!(online, "Network status changed");
        }
        previous
    }

    /// Receiver notified on every reported change
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.status.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_online_returns_previous() {
        let monitor = NetworkMonitor::default();
        assert_eq!(monitor.get_status(), NetworkStatus::Online);
        assert!(monitor.set_online(false));
        assert!(!monitor.set_online(false));
        assert_eq!(monitor.get_status(), NetworkStatus::Offline);
    }

    #[tokio::test]
    async fn test_clones_share_state_and_notify() {
        let monitor = NetworkMonitor::new(false);
        let mut rx = monitor.subscribe();
        let other = monitor.clone();

        other.set_online(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(monitor.is_online());
    }
}
