//! Live merge view
//!
//! Holds the latest authoritative snapshot from the record stream and
//! recomputes the merged list whenever a stream message arrives or the local
//! store commits a write. Consumers watch the published list instead of
//! polling the store.

use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::live::merge::merge_reports;
use crate::live::stream::{StreamConfig, StreamMessage};
use crate::models::{Report, SyncStatus};
use crate::store::ReportStore;

/// Stream connection lifecycle; `Disconnected` is never terminal while the
/// view is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// One ordered, deduplicated view over remote and locally-pending reports
pub struct LiveView {
    store: Arc<ReportStore>,
    snapshot: Mutex<Vec<Report>>,
    merged: watch::Sender<Vec<Report>>,
    connection: watch::Sender<ConnectionState>,
}

impl LiveView {
    /// Create a view over the given store, merged from local state only
    /// until the first stream message arrives
    pub fn new(store: Arc<ReportStore>) -> Result<Self> {
        let (merged, _) = watch::channel(Vec::new());
        let (connection, _) = watch::channel(ConnectionState::Disconnected);
        let view = Self {
            store,
            snapshot: Mutex::new(Vec::new()),
            merged,
            connection,
        };
        view.refresh()?;
        Ok(view)
    }

    /// Watch the merged, ordered report list
    #[must_use]
    pub fn merged(&self) -> watch::Receiver<Vec<Report>> {
        self.merged.subscribe()
    }

    /// Watch the stream connection state
    #[must_use]
    pub fn connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }

    /// Replace the authoritative snapshot and recompute the merged list
    pub fn apply_message(&self, message: StreamMessage) -> Result<()> {
        let records = message
            .records
            .into_iter()
            .map(super::stream::RemoteRecord::into_report)
            .collect();
        *self.lock_snapshot() = records;
        self.refresh()
    }

    /// Recompute the merged list from the snapshot and the store's pending set
    pub fn refresh(&self) -> Result<()> {
        let pending = self.store.reports_by_status(SyncStatus::Pending)?;
        let snapshot = self.lock_snapshot().clone();
        self.merged.send_replace(merge_reports(&snapshot, &pending));
        Ok(())
    }

    /// Start the stream subscription and the store-event listener
    ///
    /// The subscription reconnects after `config.reconnect_delay` whenever the
    /// connection drops. [`LiveViewTask::stop`] closes both tasks.
    pub fn start(self: &Arc<Self>, stream_url: impl Into<String>, config: StreamConfig) -> LiveViewTask {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let store_handle = tokio::spawn(store_events_loop(
            Arc::clone(self),
            self.store.subscribe(),
            shutdown_rx.clone(),
        ));
        let stream_handle = tokio::spawn(stream_loop(
            Arc::clone(self),
            stream_url.into(),
            config,
            shutdown_rx,
        ));

        LiveViewTask {
            shutdown: shutdown_tx,
            store_handle,
            stream_handle,
        }
    }

    fn lock_snapshot(&self) -> std::sync::MutexGuard<'_, Vec<Report>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Recompute on every committed store write
async fn store_events_loop(
    view: Arc<LiveView>,
    mut events: broadcast::Receiver<crate::store::StoreEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            event = events.recv() => match event {
                // A lagged receiver lost events, not state: re-query anyway
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    if let Err(error) = view.refresh() {
                        tracing::warn!("live view refresh failed: {error}");
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

/// Long-lived SSE subscription with fixed-delay reconnect
async fn stream_loop(
    view: Arc<LiveView>,
    url: String,
    config: StreamConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        view.connection.send_replace(ConnectionState::Connecting);
        let mut source = EventSource::get(url.as_str());

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    view.connection.send_replace(ConnectionState::Disconnected);
                    return;
                }
                event = source.next() => match event {
                    Some(Ok(Event::Open)) => {
                        tracing::debug!("record stream connected");
                        view.connection.send_replace(ConnectionState::Connected);
                    }
                    Some(Ok(Event::Message(message))) => {
                        // Comment lines (":heartbeat") never reach us; named
                        // heartbeat events are recognized and discarded
                        if message.event == "heartbeat" {
                            continue;
                        }
                        match serde_json::from_str::<StreamMessage>(&message.data) {
                            Ok(parsed) => {
                                tracing::debug!(count = parsed.count, "record stream message");
                                if let Err(error) = view.apply_message(parsed) {
                                    tracing::warn!("failed to apply stream message: {error}");
                                }
                            }
                            Err(error) => {
                                tracing::warn!("unparseable stream message: {error}");
                            }
                        }
                    }
                    Some(Err(error)) => {
                        tracing::warn!("record stream error: {error}");
                        break;
                    }
                    None => break,
                }
            }
        }

        drop(source);
        view.connection.send_replace(ConnectionState::Disconnected);

        tokio::select! {
            _ = shutdown.changed() => return,
            () = tokio::time::sleep(config.reconnect_delay) => {}
        }
    }
}

/// Handle to a running live view
pub struct LiveViewTask {
    shutdown: watch::Sender<bool>,
    store_handle: JoinHandle<()>,
    stream_handle: JoinHandle<()>,
}

impl LiveViewTask {
    /// Close the stream connection and the store subscription
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.store_handle.await;
        let _ = self.stream_handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::stream::{RemoteRecord, StreamMessageKind};
    use crate::models::ReportId;
    use std::time::Duration;

    fn setup() -> Arc<LiveView> {
        let store = Arc::new(ReportStore::open_in_memory().unwrap());
        Arc::new(LiveView::new(store).unwrap())
    }

    fn remote_record(created_at: i64) -> RemoteRecord {
        RemoteRecord {
            id: ReportId::new(),
            location: "Dock 2".to_string(),
            technician: "Kim".to_string(),
            findings: "Corrosion on north railing".to_string(),
            created_at,
        }
    }

    fn put_pending(view: &LiveView, created_at: i64) -> Report {
        let report = Report {
            created_at,
            ..Report::new("Pump station 4", "R. Vasquez", "Seal intact, no leaks found")
        };
        view.store.put(&report).unwrap();
        report
    }

    #[test]
    fn test_new_view_shows_local_pending() {
        let store = Arc::new(ReportStore::open_in_memory().unwrap());
        let report = Report::new("Pump station 4", "R. Vasquez", "Seal intact, no leaks found");
        store.put(&report).unwrap();

        let view = LiveView::new(store).unwrap();
        let merged = view.merged().borrow().clone();
        assert_eq!(merged, vec![report]);
    }

    #[test]
    fn test_apply_message_merges_with_pending() {
        let view = setup();
        let pending = put_pending(&view, 2000);
        view.refresh().unwrap();

        let remote = remote_record(1000);
        view.apply_message(StreamMessage {
            kind: StreamMessageKind::Initial,
            count: 1,
            records: vec![remote.clone()],
        })
        .unwrap();

        let merged = view.merged().borrow().clone();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, pending.id);
        assert_eq!(merged[1].id, remote.id);
    }

    #[test]
    fn test_local_pending_wins_over_stream_copy() {
        let view = setup();
        let pending = put_pending(&view, 1000);

        // The stream already carries the record the remote just accepted
        let echoed = RemoteRecord {
            id: pending.id,
            location: pending.location.clone(),
            technician: pending.technician.clone(),
            findings: pending.findings.clone(),
            created_at: pending.created_at,
        };
        view.apply_message(StreamMessage {
            kind: StreamMessageKind::Update,
            count: 1,
            records: vec![echoed],
        })
        .unwrap();

        let merged = view.merged().borrow().clone();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, SyncStatus::Pending);
    }

    #[test]
    fn test_snapshot_is_replaced_not_accumulated() {
        let view = setup();
        let first = remote_record(1000);
        let second = remote_record(2000);

        view.apply_message(StreamMessage {
            kind: StreamMessageKind::Initial,
            count: 1,
            records: vec![first],
        })
        .unwrap();
        view.apply_message(StreamMessage {
            kind: StreamMessageKind::Update,
            count: 1,
            records: vec![second.clone()],
        })
        .unwrap();

        let merged = view.merged().borrow().clone();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, second.id);
    }

    #[tokio::test]
    async fn test_store_events_drive_refresh_while_stream_is_down() {
        let view = setup();
        let mut merged = view.merged();
        // Nothing listens on this port; the stream loop just cycles through
        // connecting -> disconnected while store events keep the view fresh
        let task = view.start(
            "http://127.0.0.1:9/stream",
            StreamConfig::default().with_reconnect_delay(Duration::from_millis(50)),
        );

        let report = put_pending(&view, 1000);
        tokio::time::timeout(Duration::from_secs(2), merged.changed())
            .await
            .expect("merged list should update")
            .unwrap();
        assert_eq!(merged.borrow().clone(), vec![report]);

        task.stop().await;
        assert_eq!(*view.connection().borrow(), ConnectionState::Disconnected);
    }
}
