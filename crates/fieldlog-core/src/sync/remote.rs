//! Remote records API client
//!
//! The remote collaborator exposes a single create endpoint and must treat
//! the client-generated report id as an idempotency key: re-sending a record
//! it already accepted (a reply lost after a partial success) is a success,
//! not a duplicate.

use std::future::Future;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::models::Report;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Wire representation sent to the remote create endpoint
///
/// Carries the content fields plus id and creation time; the local sync
/// `status` is bookkeeping and never leaves the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPush {
    pub id: String,
    pub location: String,
    pub technician: String,
    pub findings: String,
    pub created_at: i64,
}

impl From<&Report> for RecordPush {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.to_string(),
            location: report.location.clone(),
            technician: report.technician.clone(),
            findings: report.findings.clone(),
            created_at: report.created_at,
        }
    }
}

/// Seam between the sync engine and the remote service
pub trait RecordsApi: Send + Sync {
    /// Push one record to the remote create endpoint
    fn create_record(&self, push: &RecordPush) -> impl Future<Output = RemoteResult<()>> + Send;
}

/// HTTP implementation of [`RecordsApi`]
#[derive(Clone)]
pub struct HttpRecordsApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRecordsApi {
    /// Create a client for the records API at the given base URL
    pub fn new(base_url: impl Into<String>) -> RemoteResult<Self> {
        let base_url = normalize_endpoint(base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder().build()?,
        })
    }
}

impl RecordsApi for HttpRecordsApi {
    async fn create_record(&self, push: &RecordPush) -> RemoteResult<()> {
        let response = self
            .client
            .post(format!("{}/records", self.base_url))
            .header("Accept", "application/json")
            .json(push)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected(parse_api_error(status, &body)));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> RemoteResult<String> {
    let endpoint = raw.trim();
    if endpoint.is_empty() {
        return Err(RemoteError::InvalidConfiguration(
            "endpoint must not be empty".to_string(),
        ));
    }
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(RemoteError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
