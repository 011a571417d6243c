use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use fieldlog_core::{Report, ReportStore};
use serde::Serialize;

use crate::error::CliError;

/// Remote endpoints resolved from the environment
pub struct RemoteConfig {
    pub api_url: String,
    pub stream_url: Option<String>,
}

/// Resolve remote endpoints; `None` means local-only operation
pub fn remote_config_from_env() -> Option<RemoteConfig> {
    let api_url = env::var("FIELDLOG_API_URL").ok().filter(|url| !url.is_empty())?;
    let stream_url = env::var("FIELDLOG_STREAM_URL")
        .ok()
        .filter(|url| !url.is_empty());
    Some(RemoteConfig { api_url, stream_url })
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("FIELDLOG_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fieldlog")
        .join("fieldlog.db")
}

pub fn open_store(path: &Path) -> Result<Arc<ReportStore>, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Arc::new(ReportStore::open(path)?))
}

#[derive(Debug, Serialize)]
pub struct ReportListItem {
    pub id: String,
    pub location: String,
    pub technician: String,
    pub findings: String,
    pub status: String,
    pub created_at: i64,
    pub synced_at: Option<i64>,
    pub relative_time: String,
}

pub fn report_to_list_item(report: &Report) -> ReportListItem {
    let now_ms = Utc::now().timestamp_millis();
    ReportListItem {
        id: report.id.to_string(),
        location: report.location.clone(),
        technician: report.technician.clone(),
        findings: report.findings.clone(),
        status: report.status.to_string(),
        created_at: report.created_at,
        synced_at: report.synced_at,
        relative_time: format_relative_time(report.created_at, now_ms),
    }
}

pub fn format_report_lines(reports: &[Report]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    reports
        .iter()
        .map(|report| {
            let id = report.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let location = truncate(&report.location, 24);
            let relative_time = format_relative_time(report.created_at, now_ms);
            format!(
                "{short_id:<13}  {location:<24}  {:<7}  {relative_time}",
                report.status
            )
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}
