use std::path::Path;
use std::sync::Arc;

use fieldlog_core::sync::{Connectivity, HttpRecordsApi, SyncConfig, SyncEngine, SyncOutcome};

use crate::commands::common::{open_store, remote_config_from_env};
use crate::error::CliError;

pub async fn run_sync(db_path: &Path) -> Result<(), CliError> {
    let Some(remote_config) = remote_config_from_env() else {
        return Err(CliError::RemoteNotConfigured);
    };

    let store = open_store(db_path)?;
    let remote =
        HttpRecordsApi::new(remote_config.api_url).map_err(fieldlog_core::Error::Remote)?;
    let engine = Arc::new(SyncEngine::new(
        store,
        remote,
        Connectivity::new(true),
        SyncConfig::default(),
    ));

    match engine.sync_pending().await? {
        SyncOutcome::Completed(summary) => {
            println!("Synced {} report(s), {} failed", summary.pushed, summary.failed);
        }
        SyncOutcome::SkippedOffline | SyncOutcome::AlreadyInFlight => {
            println!("Sync skipped");
        }
    }
    Ok(())
}
