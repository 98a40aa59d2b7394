use async_trait::async_trait;
use freerecall_core::{HistoryRecord, Material, RecallAttempt, RecallResult, Topic};
use thiserror::Error;

/// Anything other than a 2xx with a well-formed body.
///
/// Views do not look inside: every variant is simply "the request failed".
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait StudyApi: Send + Sync {
    /// `POST /upload`. The response body is ignored.
    async fn upload(&self, material: &Material) -> Result<(), ApiError>;
    /// `GET /due`.
    async fn due(&self) -> Result<Vec<Topic>, ApiError>;
    /// `POST /recall`.
    async fn recall(&self, attempt: &RecallAttempt) -> Result<RecallResult, ApiError>;
    /// `GET /history/:topic`, in the order the server returns.
    async fn history(&self, topic: &Topic) -> Result<Vec<HistoryRecord>, ApiError>;
}
