//! Wire types for the server-pushed record stream
//!
//! Every stream message carries the full current list of authoritative
//! records, not a delta; the view replaces its snapshot wholesale.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Report, ReportId, SyncStatus};

/// Configuration for the stream subscription
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Delay before reconnecting after a dropped connection (default: 3 s)
    pub reconnect_delay: Duration,
}

impl StreamConfig {
    /// Set the reconnect delay
    #[must_use]
    pub const fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// Whether a message is the first snapshot or a later replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamMessageKind {
    Initial,
    Update,
}

/// One server-pushed message: the full current authoritative list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMessage {
    #[serde(rename = "type")]
    pub kind: StreamMessageKind,
    pub count: usize,
    pub records: Vec<RemoteRecord>,
}

/// A record as the remote represents it
///
/// The server carries no local sync bookkeeping; materialized locally these
/// records are authoritative, hence `synced`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub id: ReportId,
    pub location: String,
    pub technician: String,
    pub findings: String,
    pub created_at: i64,
}

impl RemoteRecord {
    /// Materialize the remote representation as a local report
    #[must_use]
    pub fn into_report(self) -> Report {
        Report {
            id: self.id,
            location: self.location,
            technician: self.technician,
            findings: self.findings,
            status: SyncStatus::Synced,
            created_at: self.created_at,
            synced_at: None,
        }
    }
}
