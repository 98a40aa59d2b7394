use freerecall_core::{Material, Topic};

use super::Phase;
use crate::{ApiError, StudyApi};

pub const UPLOAD_OK: &str = "Uploaded!";
pub const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadField {
    Topic,
    Content,
}

/// Upload form: topic plus content, both required.
#[derive(Clone, Debug, Default)]
pub struct UploadView {
    topic: String,
    content: String,
    phase: Phase<()>,
}

impl UploadView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn phase(&self) -> &Phase<()> {
        &self.phase
    }

    /// Mutable access for editing; any edit returns the form to idle.
    pub fn field_mut(&mut self, field: UploadField) -> &mut String {
        self.phase = Phase::Idle;
        match field {
            UploadField::Topic => &mut self.topic,
            UploadField::Content => &mut self.content,
        }
    }

    pub fn set(&mut self, field: UploadField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// `None` while a required field is empty; no request should be made.
    pub fn begin(&mut self) -> Option<Material> {
        if self.topic.is_empty() || self.content.is_empty() {
            return None;
        }
        self.phase = Phase::Submitting;
        Some(Material {
            topic: Topic::new(self.topic.clone()),
            content: self.content.clone(),
        })
    }

    pub fn finish(&mut self, result: Result<(), ApiError>) {
        self.phase = Phase::settle(result);
        if self.phase.success().is_some() {
            self.topic.clear();
            self.content.clear();
        }
    }

    pub async fn submit<A: StudyApi + ?Sized>(&mut self, api: &A) {
        if let Some(material) = self.begin() {
            let result = api.upload(&material).await;
            self.finish(result);
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Success(()) => Some(UPLOAD_OK),
            Phase::Failure => Some(UPLOAD_FAILED),
            Phase::Idle | Phase::Submitting => None,
        }
    }
}
