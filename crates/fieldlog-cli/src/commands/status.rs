use std::path::Path;

use fieldlog_core::SyncStatus;

use crate::commands::common::open_store;
use crate::error::CliError;

pub fn run_status(db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;

    let pending = store.pending_count()?;
    let synced = store.reports_by_status(SyncStatus::Synced)?.len();

    println!("{pending} pending, {synced} synced");
    Ok(())
}
