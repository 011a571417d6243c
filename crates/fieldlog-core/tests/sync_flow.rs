//! End-to-end offline capture and sync scenario

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fieldlog_core::factory::ReportFactory;
use fieldlog_core::sync::{Connectivity, RecordPush, RecordsApi, RemoteResult, SyncConfig, SyncEngine};
use fieldlog_core::{ReportStore, SyncStatus};

/// Remote that records every accepted push, shared with the test body
#[derive(Clone, Default)]
struct RecordingRemote {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingRemote {
    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl RecordsApi for RecordingRemote {
    async fn create_record(&self, push: &RecordPush) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(push.id.clone());
        Ok(())
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within deadline"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn offline_capture_syncs_on_reconnect_and_fast_path() {
    let store = Arc::new(ReportStore::open_in_memory().unwrap());
    let factory = ReportFactory::new(Arc::clone(&store));
    let remote = RecordingRemote::default();
    let connectivity = Connectivity::new(false);

    // Long interval: only connectivity transitions and the fast path may
    // drive this test
    let engine = Arc::new(SyncEngine::new(
        Arc::clone(&store),
        remote.clone(),
        connectivity.clone(),
        SyncConfig::default().with_sync_interval(Duration::from_secs(600)),
    ));
    let task = engine.start();

    // Create R1 while offline: persisted as pending, zero remote calls
    let first = factory
        .create("Pump station 4", "R. Vasquez", "Seal intact, no leaks found")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(remote.call_count(), 0);
    assert!(store.get(&first.id).unwrap().unwrap().is_pending());

    // Going online fires a pass: one call for R1, flipped to synced
    connectivity.set_online(true);
    wait_until(|| store.pending_count().unwrap() == 0).await;
    assert_eq!(remote.call_count(), 1);
    let synced = store.get(&first.id).unwrap().unwrap();
    assert_eq!(synced.status, SyncStatus::Synced);
    assert!(synced.synced_at.is_some());

    // Create R2 while online: the fast path pushes it without waiting for
    // the periodic timer
    let second = factory
        .create("Dock 2", "Kim", "Corrosion on north railing")
        .unwrap();
    engine.trigger();
    wait_until(|| store.pending_count().unwrap() == 0).await;
    assert_eq!(remote.call_count(), 2);
    assert!(!store.get(&second.id).unwrap().unwrap().is_pending());

    task.stop().await;
}

#[tokio::test]
async fn periodic_timer_retries_pending_reports() {
    let store = Arc::new(ReportStore::open_in_memory().unwrap());
    let factory = ReportFactory::new(Arc::clone(&store));
    let remote = RecordingRemote::default();

    // Online from the start; a short timer picks the report up on its own
    let engine = Arc::new(SyncEngine::new(
        Arc::clone(&store),
        remote.clone(),
        Connectivity::new(true),
        SyncConfig::default().with_sync_interval(Duration::from_millis(20)),
    ));
    let task = engine.start();

    factory
        .create("Substation B", "Ng", "Transformer oil level nominal")
        .unwrap();
    wait_until(|| store.pending_count().unwrap() == 0).await;
    assert_eq!(remote.call_count(), 1);

    task.stop().await;
}
