use std::collections::BTreeSet;

use freerecall_core::{HistoryRecord, Topic};

use super::Phase;
use crate::{ApiError, StudyApi};

/// Past attempts for a typed-in topic. Failures and "no history yet" look the same.
#[derive(Clone, Debug, Default)]
pub struct HistoryView {
    topic: String,
    phase: Phase<Vec<HistoryRecord>>,
    expanded: BTreeSet<usize>,
}

impl HistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn topic_mut(&mut self) -> &mut String {
        &mut self.topic
    }

    pub fn phase(&self) -> &Phase<Vec<HistoryRecord>> {
        &self.phase
    }

    /// `None` when no topic has been typed.
    pub fn begin(&mut self) -> Option<Topic> {
        if self.topic.is_empty() {
            return None;
        }
        self.phase = Phase::Submitting;
        self.expanded.clear();
        Some(Topic::new(self.topic.clone()))
    }

    pub fn finish(&mut self, result: Result<Vec<HistoryRecord>, ApiError>) {
        self.phase = Phase::settle(result);
        self.expanded.clear();
    }

    pub async fn load<A: StudyApi + ?Sized>(&mut self, api: &A) {
        if let Some(topic) = self.begin() {
            let result = api.history(&topic).await;
            self.finish(result);
        }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        self.phase.success().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn toggle(&mut self, idx: usize) {
        if idx >= self.records().len() {
            return;
        }
        if !self.expanded.remove(&idx) {
            self.expanded.insert(idx);
        }
    }

    pub fn is_expanded(&self, idx: usize) -> bool {
        self.expanded.contains(&idx)
    }

    pub fn summary(record: &HistoryRecord) -> String {
        format!("{} - Score {}", record.created_at, record.score)
    }

    /// Collapsed records show one summary line; expanded ones add feedback and recall.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (i, r) in self.records().iter().enumerate() {
            out.push(Self::summary(r));
            if self.is_expanded(i) {
                out.push(format!("  Feedback: {}", r.feedback));
                out.push(format!("  Your recall: {}", r.recall_text));
            }
        }
        out
    }
}
