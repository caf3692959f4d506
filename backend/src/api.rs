//! Client seam for the upstream school REST API.
//!
//! The aggregators only know the [`SchoolApi`] trait; the HTTP
//! implementation lives here so tests can substitute an in-memory fake.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use shared::{AttendanceRecord, Child, Group, PaymentRecord, ScheduledDatesResponse};

/// Per-request timeout for upstream calls. A slice that times out is
/// reported as a failed slice, never left in flight indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single upstream request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("school API request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("school API returned {status} for {path}")]
    Status { status: StatusCode, path: String },
}

/// The upstream operations the status view consumes.
///
/// Every method maps to one read-only endpoint of the school backend.
/// Callers treat a failure as "no data for this slice".
#[async_trait]
pub trait SchoolApi: Send + Sync {
    async fn list_children(&self, parent_id: i64) -> Result<Vec<Child>, ApiError>;
    async fn list_groups(&self) -> Result<Vec<Group>, ApiError>;
    async fn attendance_history(&self, group_id: i64) -> Result<Vec<AttendanceRecord>, ApiError>;
    async fn payment_status(
        &self,
        group_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<PaymentRecord>, ApiError>;
    async fn scheduled_dates(&self, group_id: i64) -> Result<ScheduledDatesResponse, ApiError>;
}

/// reqwest-backed [`SchoolApi`] implementation.
#[derive(Clone)]
pub struct HttpSchoolApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSchoolApi {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status(),
                path,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SchoolApi for HttpSchoolApi {
    async fn list_children(&self, parent_id: i64) -> Result<Vec<Child>, ApiError> {
        self.get_json(format!("/api/children?parentId={}", parent_id))
            .await
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.get_json("/api/groups".to_string()).await
    }

    async fn attendance_history(&self, group_id: i64) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.get_json(format!("/api/groups/{}/attendance-history", group_id))
            .await
    }

    async fn payment_status(
        &self,
        group_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<PaymentRecord>, ApiError> {
        self.get_json(format!(
            "/api/groups/{}/payment-status/{}/{}",
            group_id, year, month
        ))
        .await
    }

    async fn scheduled_dates(&self, group_id: i64) -> Result<ScheduledDatesResponse, ApiError> {
        self.get_json(format!("/api/groups/{}/scheduled-dates", group_id))
            .await
    }
}
