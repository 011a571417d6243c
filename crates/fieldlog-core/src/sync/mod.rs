//! Background synchronization: connectivity signal, remote records client,
//! and the sync engine that converges the local store with the remote.

mod connectivity;
mod engine;
mod remote;

pub use connectivity::Connectivity;
pub use engine::{SyncConfig, SyncEngine, SyncOutcome, SyncSummary, SyncTask};
pub use remote::{HttpRecordsApi, RecordPush, RecordsApi, RemoteResult};
