//! Data models for Fieldlog

mod report;

pub use report::{Report, ReportId, SyncStatus};
