use freerecall_core::{RecallAttempt, RecallResult, Route, Topic};

use super::Phase;
use crate::{ApiError, StudyApi};

pub const RECALL_FAILED: &str = "Recall failed";

/// Free-recall form for one topic. Grading happens on the server.
#[derive(Clone, Debug)]
pub struct RecallView {
    topic: Topic,
    recall_text: String,
    phase: Phase<RecallResult>,
}

impl RecallView {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            recall_text: String::new(),
            phase: Phase::Idle,
        }
    }

    /// Build from a navigation route; only `/recall/:topic` carries a topic.
    pub fn from_route(route: &Route) -> Option<Self> {
        match route {
            Route::Recall(topic) => Some(Self::new(topic.clone())),
            _ => None,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn title(&self) -> String {
        format!("Recall: {}", self.topic)
    }

    pub fn recall_text(&self) -> &str {
        &self.recall_text
    }

    pub fn text_mut(&mut self) -> &mut String {
        self.phase = Phase::Idle;
        &mut self.recall_text
    }

    pub fn phase(&self) -> &Phase<RecallResult> {
        &self.phase
    }

    pub fn begin(&mut self) -> Option<RecallAttempt> {
        if self.recall_text.is_empty() {
            return None;
        }
        self.phase = Phase::Submitting;
        Some(RecallAttempt {
            topic: self.topic.clone(),
            recall_text: self.recall_text.clone(),
        })
    }

    pub fn finish(&mut self, result: Result<RecallResult, ApiError>) {
        self.phase = Phase::settle(result);
    }

    pub async fn submit<A: StudyApi + ?Sized>(&mut self, api: &A) {
        if let Some(attempt) = self.begin() {
            let result = api.recall(&attempt).await;
            self.finish(result);
        }
    }

    pub fn result(&self) -> Option<&RecallResult> {
        self.phase.success()
    }

    /// Lines to show under the form once the request has settled.
    pub fn result_lines(&self) -> Vec<String> {
        match &self.phase {
            Phase::Success(r) => vec![
                format!("Score: {}", r.score),
                format!("Feedback: {}", r.feedback),
                format!("Cards Added: {}", r.cards_added),
                format!("Next Review: {}", r.next_review),
            ],
            Phase::Failure => vec![RECALL_FAILED.to_string()],
            Phase::Idle | Phase::Submitting => Vec::new(),
        }
    }
}
