use freerecall_core::{Route, Topic};

use super::Phase;
use crate::{ApiError, StudyApi};

pub const NO_TOPICS_DUE: &str = "No topics due.";

/// One entry of the due list, linking to its recall page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueLink {
    pub label: String,
    pub href: String,
}

impl DueLink {
    pub fn route(&self) -> Route {
        Route::parse(&self.href)
    }
}

/// Topics the server says are ready for practice.
///
/// A failed fetch renders exactly like an empty list.
#[derive(Clone, Debug, Default)]
pub struct DueView {
    phase: Phase<Vec<Topic>>,
}

impl DueView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase<Vec<Topic>> {
        &self.phase
    }

    pub fn begin(&mut self) {
        self.phase = Phase::Submitting;
    }

    pub fn finish(&mut self, result: Result<Vec<Topic>, ApiError>) {
        self.phase = Phase::settle(result);
    }

    pub async fn load<A: StudyApi + ?Sized>(&mut self, api: &A) {
        self.begin();
        let result = api.due().await;
        self.finish(result);
    }

    pub fn topics(&self) -> &[Topic] {
        self.phase.success().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn links(&self) -> Vec<DueLink> {
        self.topics()
            .iter()
            .map(|t| DueLink {
                label: t.to_string(),
                href: Route::Recall(t.clone()).path(),
            })
            .collect()
    }

    /// Shown once a fetch has settled with nothing to list.
    pub fn empty_message(&self) -> Option<&'static str> {
        let settled = matches!(self.phase, Phase::Success(_) | Phase::Failure);
        (settled && self.topics().is_empty()).then_some(NO_TOPICS_DUE)
    }
}
