//! Local report store
//!
//! The store exclusively owns record storage. All writers go through `put`
//! and `mark_synced`, which are atomic with respect to each other, and every
//! committed write is announced on a broadcast channel so reactive views can
//! recompute without polling.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::{params, Connection};
use tokio::sync::broadcast;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Report, ReportId, SyncStatus};

/// Capacity of the committed-write event channel. A lagging subscriber loses
/// old events, not writes; it can always re-query the store.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A committed write, published synchronously after the transaction lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A new pending report was inserted
    Created(ReportId),
    /// A report was flipped to synced
    Synced(ReportId),
}

/// Durable, queryable table of reports, keyed by client-generated id
pub struct ReportStore {
    conn: Mutex<Connection>,
    events: broadcast::Sender<StoreEvent>,
}

impl ReportStore {
    /// Create a store over an opened database
    #[must_use]
    pub fn new(db: Database) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            conn: Mutex::new(db.into_connection()),
            events,
        }
    }

    /// Open a store at the given filesystem path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Open an in-memory store (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Subscribe to committed-write events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Insert a new report
    ///
    /// Fails with [`Error::DuplicateId`] if the id already exists; ids are
    /// generated by the creator and must never collide.
    pub fn put(&self, report: &Report) -> Result<()> {
        {
            let conn = self.lock_conn();
            conn.execute(
                "INSERT INTO reports (id, location, technician, findings, status, created_at, synced_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    report.id.as_str(),
                    report.location,
                    report.technician,
                    report.findings,
                    report.status.as_str(),
                    report.created_at,
                    report.synced_at,
                ],
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(failure, _)
                    if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Error::DuplicateId(report.id.to_string())
                }
                other => Error::Database(other),
            })?;
        }

        let _ = self.events.send(StoreEvent::Created(report.id));
        Ok(())
    }

    /// Atomically flip a report to synced and stamp `synced_at`
    ///
    /// Fails with [`Error::NotFound`] if the id is absent. A report that is
    /// already synced is left untouched and reported as success, so the sync
    /// engine can retry after a lost reply without special-casing.
    pub fn mark_synced(&self, id: &ReportId, synced_at: i64) -> Result<()> {
        let flipped = {
            let conn = self.lock_conn();
            let rows = conn.execute(
                "UPDATE reports SET status = 'synced', synced_at = ?
                 WHERE id = ? AND status = 'pending'",
                params![synced_at, id.as_str()],
            )?;

            if rows == 0 {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM reports WHERE id = ?)",
                    params![id.as_str()],
                    |row| row.get::<_, i32>(0).map(|flag| flag != 0),
                )?;
                if !exists {
                    return Err(Error::NotFound(id.to_string()));
                }
            }
            rows > 0
        };

        // Idempotent retries commit nothing, so observers hear nothing
        if flipped {
            let _ = self.events.send(StoreEvent::Synced(*id));
        }
        Ok(())
    }

    /// Fetch a report by id
    pub fn get(&self, id: &ReportId) -> Result<Option<Report>> {
        let conn = self.lock_conn();
        let result = conn.query_row(
            "SELECT id, location, technician, findings, status, created_at, synced_at
             FROM reports WHERE id = ?",
            params![id.as_str()],
            parse_report,
        );

        match result {
            Ok(report) => Ok(Some(report)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reports with the given status, ordered by creation time ascending
    /// (oldest first, the sync engine's processing order)
    pub fn reports_by_status(&self, status: SyncStatus) -> Result<Vec<Report>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare(
            "SELECT id, location, technician, findings, status, created_at, synced_at
             FROM reports
             WHERE status = ?
             ORDER BY created_at ASC, id ASC",
        )?;

        let reports = stmt
            .query_map(params![status.as_str()], parse_report)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(reports)
    }

    /// All reports, newest first
    pub fn all(&self) -> Result<Vec<Report>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare(
            "SELECT id, location, technician, findings, status, created_at, synced_at
             FROM reports
             ORDER BY created_at DESC, id DESC",
        )?;

        let reports = stmt
            .query_map([], parse_report)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(reports)
    }

    /// Number of reports still awaiting remote acceptance
    pub fn pending_count(&self) -> Result<usize> {
        let conn = self.lock_conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reports WHERE status = 'pending'",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse a report from a database row
fn parse_report(row: &rusqlite::Row<'_>) -> rusqlite::Result<Report> {
    let id: String = row.get(0)?;
    let status: String = row.get(4)?;
    Ok(Report {
        id: id.parse().unwrap_or_default(),
        location: row.get(1)?,
        technician: row.get(2)?,
        findings: row.get(3)?,
        status: status.parse().unwrap_or(SyncStatus::Pending),
        created_at: row.get(5)?,
        synced_at: row.get(6)?,
    })
}
