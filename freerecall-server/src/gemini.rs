//! Scorer backed by Google's Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use freerecall_core::{parse_report, CoreError, ScoreReport, Scorer};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiScorer {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiScorer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    /// Point at a different base URL (a proxy, or a local stub).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<PartIn<'a>>,
}

#[derive(Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate's first non-empty part.
    pub(crate) fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .find(|t| !t.trim().is_empty())
    }
}

#[async_trait]
impl Scorer for GeminiScorer {
    async fn score(&self, prompt: &str) -> Result<ScoreReport, CoreError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartIn { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        debug!(model = %self.model, prompt_len = prompt.len(), "calling gemini");

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Scoring(format!("gemini request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(CoreError::Scoring(format!(
                "gemini returned HTTP {}",
                resp.status()
            )));
        }
        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Scoring(format!("gemini body: {e}")))?;
        let text = parsed
            .first_text()
            .ok_or_else(|| CoreError::Scoring("no text returned from gemini".into()))?;
        parse_report(text)
    }
}
