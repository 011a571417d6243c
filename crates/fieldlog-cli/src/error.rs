use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] fieldlog_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(
        "Remote is not configured. Set FIELDLOG_API_URL (and FIELDLOG_STREAM_URL for `fieldlog watch`)."
    )]
    RemoteNotConfigured,
}
