//! Sync engine
//!
//! Converges the local store with the remote records service without operator
//! intervention. A pass runs when connectivity returns, on a periodic timer
//! while online, or on the fast-path trigger fired right after a new report
//! is created. At most one pass is in flight per engine; overlapping triggers
//! are dropped rather than double-pushing the same report.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::SyncStatus;
use crate::store::ReportStore;
use crate::sync::connectivity::Connectivity;
use crate::sync::remote::{RecordPush, RecordsApi};

/// Configuration for the sync engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Periodic sync interval while online (default: 30 seconds)
    pub sync_interval: Duration,
}

impl SyncConfig {
    /// Set the periodic sync interval
    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(30),
        }
    }
}

/// Counts from one completed sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Reports accepted by the remote and flipped to synced
    pub pushed: usize,
    /// Reports left pending for a later trigger
    pub failed: usize,
}

/// Result of asking the engine for a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A pass ran to completion
    Completed(SyncSummary),
    /// The host is offline; nothing was pushed
    SkippedOffline,
    /// Another pass is already in flight; the trigger was dropped
    AlreadyInFlight,
}

/// Background process pushing pending reports to the remote
pub struct SyncEngine<R> {
    store: Arc<ReportStore>,
    remote: R,
    connectivity: Connectivity,
    config: SyncConfig,
    fast_path: Notify,
    in_flight: Mutex<()>,
}

impl<R: RecordsApi + 'static> SyncEngine<R> {
    /// Create an engine over the given store and remote
    pub fn new(
        store: Arc<ReportStore>,
        remote: R,
        connectivity: Connectivity,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            remote,
            connectivity,
            config,
            fast_path: Notify::new(),
            in_flight: Mutex::new(()),
        }
    }

    /// Fast-path trigger: request a pass without waiting for the next tick
    ///
    /// Called right after a new report is created while already online.
    pub fn trigger(&self) {
        self.fast_path.notify_one();
    }

    /// Run one sync pass now, unless offline or one is already in flight
    ///
    /// Pending reports are pushed sequentially, oldest first. A failed push
    /// leaves its report pending and does not abort the batch; the report is
    /// retried on the next trigger, indefinitely.
    pub async fn sync_pending(&self) -> Result<SyncOutcome> {
        let Ok(_pass) = self.in_flight.try_lock() else {
            return Ok(SyncOutcome::AlreadyInFlight);
        };

        if !self.connectivity.is_online() {
            return Ok(SyncOutcome::SkippedOffline);
        }

        let pending = self.store.reports_by_status(SyncStatus::Pending)?;
        let mut summary = SyncSummary::default();

        for report in &pending {
            match self.remote.create_record(&RecordPush::from(report)).await {
                Ok(()) => {
                    let now = chrono::Utc::now().timestamp_millis();
                    match self.store.mark_synced(&report.id, now) {
                        Ok(()) => summary.pushed += 1,
                        Err(error) => {
                            // Accepted remotely but not recorded; the retry
                            // leans on the remote's idempotency on id
                            tracing::error!(id = %report.id, "failed to record sync: {error}");
                            summary.failed += 1;
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(id = %report.id, "push failed, will retry: {error}");
                    summary.failed += 1;
                }
            }
        }

        Ok(SyncOutcome::Completed(summary))
    }

    /// Start the background task owning the timer and subscriptions
    ///
    /// Returns a handle whose [`SyncTask::stop`] ends the task and its timer.
    pub fn start(self: &Arc<Self>) -> SyncTask {
        let engine = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut online_rx = engine.connectivity.subscribe();
            let mut was_online = engine.connectivity.is_online();
            let mut connectivity_live = true;

            let mut ticker = tokio::time::interval(engine.config.sync_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        engine.run_pass("periodic tick").await;
                    }
                    changed = online_rx.changed(), if connectivity_live => {
                        if changed.is_err() {
                            // Signal source gone; fall back to the timer only
                            connectivity_live = false;
                            continue;
                        }
                        let online_now = *online_rx.borrow_and_update();
                        if online_now && !was_online {
                            engine.run_pass("connectivity restored").await;
                        }
                        was_online = online_now;
                    }
                    () = engine.fast_path.notified() => {
                        engine.run_pass("fast-path trigger").await;
                    }
                }
            }

            tracing::debug!("sync engine task stopped");
        });

        SyncTask {
            shutdown: shutdown_tx,
            handle,
        }
    }

    async fn run_pass(&self, reason: &str) {
        match self.sync_pending().await {
            Ok(SyncOutcome::Completed(summary)) if summary.pushed > 0 || summary.failed > 0 => {
                tracing::info!(
                    reason,
                    pushed = summary.pushed,
                    failed = summary.failed,
                    "sync pass completed"
                );
            }
            Ok(SyncOutcome::Completed(_)) => {}
            Ok(SyncOutcome::SkippedOffline) => {
                tracing::debug!(reason, "sync pass skipped: offline");
            }
            Ok(SyncOutcome::AlreadyInFlight) => {
                tracing::debug!(reason, "sync pass skipped: already in flight");
            }
            // Local store failure; never fatal to the host process
            Err(error) => tracing::error!(reason, "sync pass failed: {error}"),
        }
    }
}

/// Handle to a running sync engine task
pub struct SyncTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncTask {
    /// Stop the timer and subscriptions and wait for the task to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
