use async_trait::async_trait;
use freerecall_core::{
    history_endpoint, HistoryRecord, Material, RecallAttempt, RecallResult, Topic, DUE_PATH,
    RECALL_PATH, UPLOAD_PATH,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiError, StudyApi};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// [`StudyApi`] over HTTP/JSON.
///
/// One attempt per call, no retries. No timeout is set, so a hung server
/// keeps the caller waiting.
#[derive(Clone, Debug)]
pub struct HttpStudyApi {
    client: Client,
    base_url: String,
}

impl HttpStudyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for HttpStudyApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn ensure_success(resp: &Response) -> Result<(), ApiError> {
    let status = resp.status();
    if !status.is_success() {
        debug!(%status, url = %resp.url(), "request failed");
        return Err(ApiError::Status(status.as_u16()));
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    ensure_success(&resp)?;
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!("undecodable body: {e}");
        ApiError::Decode(e.to_string())
    })
}

fn log_transport(e: reqwest::Error) -> ApiError {
    debug!("transport error: {e}");
    ApiError::Transport(e)
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn upload(&self, material: &Material) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url(UPLOAD_PATH))
            .json(material)
            .send()
            .await
            .map_err(log_transport)?;
        ensure_success(&resp)
    }

    async fn due(&self) -> Result<Vec<Topic>, ApiError> {
        let resp = self
            .client
            .get(self.url(DUE_PATH))
            .send()
            .await
            .map_err(log_transport)?;
        read_json(resp).await
    }

    async fn recall(&self, attempt: &RecallAttempt) -> Result<RecallResult, ApiError> {
        let resp = self
            .client
            .post(self.url(RECALL_PATH))
            .json(attempt)
            .send()
            .await
            .map_err(log_transport)?;
        read_json(resp).await
    }

    async fn history(&self, topic: &Topic) -> Result<Vec<HistoryRecord>, ApiError> {
        let resp = self
            .client
            .get(self.url(&history_endpoint(topic)))
            .send()
            .await
            .map_err(log_transport)?;
        read_json(resp).await
    }
}
