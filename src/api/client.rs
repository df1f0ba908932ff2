use super::types::{
    AttendanceStatus, RecognitionResponse, RosterEntry, ScheduledSession, SessionPage,
};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from the attendance data API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Error message reported by the backend itself
    #[error("{0}")]
    Service(String),
}

/// Client-side view of the attendance backend. Injected into the session
/// controller so tests can substitute an in-memory implementation.
#[async_trait::async_trait]
pub trait AttendanceApi: Send + Sync {
    /// Scheduled sessions for the operator's current day, in start order.
    async fn today_sessions(&self) -> Result<Vec<ScheduledSession>, ApiError>;

    /// Submit a still frame for recognition; the server upserts attendance.
    async fn recognize(
        &self,
        session_id: i64,
        jpeg: Vec<u8>,
    ) -> Result<RecognitionResponse, ApiError>;

    /// Authoritative attendance roster for a session.
    async fn attendance_log(&self, session_id: i64) -> Result<Vec<RosterEntry>, ApiError>;

    /// Manually set one roster entry's status.
    async fn update_attendance(
        &self,
        entry_id: i64,
        status: AttendanceStatus,
    ) -> Result<RosterEntry, ApiError>;
}

/// HTTP implementation over the backend's REST endpoints.
pub struct HttpAttendanceApi {
    client: Client,
    base_url: String,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpAttendanceApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Turn a non-success response into the backend's own error message
    /// when one is present, else the HTTP status line.
    async fn service_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => ApiError::Service(body.error),
            Err(_) => ApiError::Service(format!("backend returned {status}")),
        }
    }
}

#[async_trait::async_trait]
impl AttendanceApi for HttpAttendanceApi {
    async fn today_sessions(&self) -> Result<Vec<ScheduledSession>, ApiError> {
        let response = self
            .client
            .get(self.url("attendance/today-sessions/"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let page: SessionPage = response.json().await?;
        Ok(page.results)
    }

    async fn recognize(
        &self,
        session_id: i64,
        jpeg: Vec<u8>,
    ) -> Result<RecognitionResponse, ApiError> {
        debug!(session_id, bytes = jpeg.len(), "submitting frame for recognition");

        let image = reqwest::multipart::Part::bytes(jpeg)
            .file_name("capture.jpg")
            .mime_str("image/jpeg")
            .map_err(ApiError::Transport)?;
        let form = reqwest::multipart::Form::new()
            .text("session_id", session_id.to_string())
            .part("image", image);

        let response = self
            .client
            .post(self.url("face/recognize/"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn attendance_log(&self, session_id: i64) -> Result<Vec<RosterEntry>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("attendance/sessions/{session_id}/attendance-log/")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn update_attendance(
        &self,
        entry_id: i64,
        status: AttendanceStatus,
    ) -> Result<RosterEntry, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("attendance/attendance-log/{entry_id}/update/")))
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        Ok(response.json().await?)
    }
}
