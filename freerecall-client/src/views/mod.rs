//! Page view models.
//!
//! Every view walks the same small machine: `Idle -> Submitting -> Success |
//! Failure`, dropping back to `Idle` on the next edit. A request is split into
//! `begin` (validate, flip to `Submitting`, hand back the payload) and
//! `finish` (fold in the outcome) so a UI can keep drawing while the call is
//! in flight. `submit`/`load` do both around a [`StudyApi`](crate::StudyApi)
//! call for callers that just await.

pub mod due;
pub mod history;
pub mod recall;
pub mod upload;

pub use due::{DueLink, DueView, NO_TOPICS_DUE};
pub use history::HistoryView;
pub use recall::{RecallView, RECALL_FAILED};
pub use upload::{UploadField, UploadView, UPLOAD_FAILED, UPLOAD_OK};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Phase<T> {
    #[default]
    Idle,
    Submitting,
    Success(T),
    Failure,
}

impl<T> Phase<T> {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Phase::Submitting)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Phase::Success(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn settle<E>(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Phase::Success(v),
            Err(_) => Phase::Failure,
        }
    }
}
