use std::path::Path;
use std::sync::Arc;

use fieldlog_core::live::{LiveView, StreamConfig};
use fieldlog_core::sync::{Connectivity, HttpRecordsApi, SyncConfig, SyncEngine};

use crate::commands::common::{format_report_lines, open_store, remote_config_from_env};
use crate::error::CliError;

pub async fn run_watch(db_path: &Path) -> Result<(), CliError> {
    let Some(remote_config) = remote_config_from_env() else {
        return Err(CliError::RemoteNotConfigured);
    };
    let Some(stream_url) = remote_config.stream_url else {
        return Err(CliError::RemoteNotConfigured);
    };

    let store = open_store(db_path)?;
    let remote =
        HttpRecordsApi::new(remote_config.api_url).map_err(fieldlog_core::Error::Remote)?;

    let engine = Arc::new(SyncEngine::new(
        Arc::clone(&store),
        remote,
        Connectivity::new(true),
        SyncConfig::default(),
    ));
    let engine_task = engine.start();

    let view = Arc::new(LiveView::new(Arc::clone(&store))?);
    let view_task = view.start(stream_url, StreamConfig::default());

    let mut merged = view.merged();
    let mut connection = view.connection();

    println!("Watching reports (Ctrl-C to stop)");
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            changed = connection.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *connection.borrow_and_update();
                tracing::info!("stream connection: {state:?}");
            }
            changed = merged.changed() => {
                if changed.is_err() {
                    break;
                }
                let reports = merged.borrow_and_update().clone();
                let pending = store.pending_count()?;
                println!("-- {} report(s), {} pending --", reports.len(), pending);
                for line in format_report_lines(&reports) {
                    println!("{line}");
                }
            }
        }
    }

    view_task.stop().await;
    engine_task.stop().await;
    Ok(())
}
