//! Report model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a report, using UUID v7 (time-sortable)
///
/// Generated on the client before first persistence and used by the remote
/// service as an idempotency key, so a duplicate submission after a lost
/// reply does not create a second record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(Uuid);

impl ReportId {
    /// Create a new unique report ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Sync state of a report. `Pending -> Synced` is the only legal transition;
/// a report never reverts to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
}

impl SyncStatus {
    /// Stable string form used in the database and on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            other => Err(format!("unknown sync status: {other}")),
        }
    }
}

/// An inspection report in the system
///
/// Content fields are immutable after creation; sync only ever flips
/// `status` and stamps `synced_at`, never patches content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier
    pub id: ReportId,
    /// Inspected site or asset
    pub location: String,
    /// Reporting technician
    pub technician: String,
    /// Inspection findings
    pub findings: String,
    /// Sync state
    pub status: SyncStatus,
    /// Creation timestamp (Unix ms), set once
    pub created_at: i64,
    /// Remote acceptance timestamp (Unix ms), absent until synced
    pub synced_at: Option<i64>,
}

impl Report {
    /// Create a new pending report with the given content
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        technician: impl Into<String>,
        findings: impl Into<String>,
    ) -> Self {
        Self {
            id: ReportId::new(),
            location: location.into(),
            technician: technician.into(),
            findings: findings.into(),
            status: SyncStatus::Pending,
            created_at: chrono::Utc::now().timestamp_millis(),
            synced_at: None,
        }
    }

    /// Whether this report still awaits remote acceptance
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, SyncStatus::Pending)
    }
}
