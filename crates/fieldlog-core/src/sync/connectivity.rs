//! Host connectivity signal
//!
//! An explicit handle instead of ambient process-wide listeners, so tests can
//! run independent engines with their own online/offline state. The host
//! platform feeds transitions in via [`Connectivity::set_online`]; when no one
//! ever does, the sync engine degrades to its periodic timer.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared online/offline flag with change notifications
#[derive(Clone)]
pub struct Connectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    /// Create a connectivity handle with the given initial state
    #[must_use]
    pub fn new(initially_online: bool) -> Self {
        let (tx, _) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    /// Record a connectivity transition from the host platform
    pub fn set_online(&self, online: bool) {
        self.tx.send_replace(online);
    }

    /// Current connectivity state
    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribe to connectivity transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Connectivity {
    /// Online until told otherwise, matching hosts that report no signal
    fn default() -> Self {
        Self::new(true)
    }
}
