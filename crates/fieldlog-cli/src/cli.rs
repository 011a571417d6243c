use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fieldlog_core::SyncStatus;

#[derive(Parser)]
#[command(name = "fieldlog")]
#[command(about = "Capture and sync field inspection reports from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new inspection report (works fully offline)
    #[command(alias = "new")]
    Add {
        /// Inspected site or asset
        #[arg(long)]
        location: String,
        /// Reporting technician
        #[arg(long)]
        technician: String,
        /// Inspection findings
        #[arg(long)]
        findings: String,
    },
    /// List reports, newest first
    List {
        /// Number of reports to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Filter by sync status
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show pending/synced counts
    Status,
    /// Push pending reports to the remote once
    Sync,
    /// Run the background sync engine and live merged view until Ctrl-C
    Watch,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Synced,
}

impl From<StatusFilter> for SyncStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Pending => Self::Pending,
            StatusFilter::Synced => Self::Synced,
        }
    }
}
