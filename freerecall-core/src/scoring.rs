use crate::{chunk_material, CardDraft, CoreError, StudyMaterial, SCORE_MAX};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// What a scorer returns for one recall attempt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u32,
    pub feedback: String,
    #[serde(default)]
    pub flashcards: Vec<CardDraft>,
}

impl ScoreReport {
    pub fn validate(self) -> Result<Self, CoreError> {
        if self.score > SCORE_MAX {
            return Err(CoreError::Scoring(format!(
                "score {} outside 0..={SCORE_MAX}",
                self.score
            )));
        }
        Ok(self)
    }
}

/// Grades a recall attempt. Implementations may call out to a language model.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, prompt: &str) -> Result<ScoreReport, CoreError>;
}

/// Deterministic scorer for tests and local runs.
#[derive(Clone, Debug, Default)]
pub struct MockScorer;

#[async_trait]
impl Scorer for MockScorer {
    async fn score(&self, _prompt: &str) -> Result<ScoreReport, CoreError> {
        Ok(ScoreReport {
            score: 100,
            feedback: "Great job!".to_string(),
            flashcards: Vec::new(),
        })
    }
}

pub fn build_prompt(material: &StudyMaterial, recall_text: &str) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are grading a free-recall exercise on the topic \"{}\".",
        material.topic
    );
    prompt.push_str("Reference material, one numbered paragraph per chunk:\n");
    for (i, chunk) in chunk_material(&material.content).iter().enumerate() {
        let _ = writeln!(prompt, "[{}] {}", i + 1, chunk);
    }
    prompt.push_str("\nWhat the learner recalled from memory:\n");
    prompt.push_str(recall_text.trim());
    prompt.push_str(
        "\n\nCompare the recall against the material. Reply with JSON only, shaped as \
         {\"score\": <integer 0-100>, \"feedback\": <string>, \
         \"flashcards\": [{\"front\": <string>, \"back\": <string>}]}. \
         Add flashcards only for important points the learner missed.",
    );
    prompt
}

/// Parse a model reply into a report. Tolerates a fenced ```json block.
pub fn parse_report(text: &str) -> Result<ScoreReport, CoreError> {
    let body = strip_fence(text.trim());
    let report: ScoreReport = serde_json::from_str(body)
        .map_err(|e| CoreError::Scoring(format!("reply was not valid JSON: {e}")))?;
    report.validate()
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
