use crate::{CoreError, Flashcard, RecallEntry, StudyMaterial, Topic, TopicSchedule};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Materials
    async fn upsert_material(
        &self,
        topic: &Topic,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<StudyMaterial, CoreError>;
    async fn get_material(&self, topic: &Topic) -> Result<StudyMaterial, CoreError>;

    // Schedules
    async fn put_schedule(&self, schedule: &TopicSchedule) -> Result<(), CoreError>;
    async fn get_schedule(&self, topic: &Topic) -> Result<TopicSchedule, CoreError>;
    /// Topics whose next review is at or before `now`, soonest first.
    async fn due_topics(&self, now: DateTime<Utc>) -> Result<Vec<Topic>, CoreError>;

    // Recall history
    /// Store a scored attempt: the history entry, its flashcards and the
    /// advanced schedule land together or not at all.
    ///
    /// Returns how many cards were new. A front/back pair is stored once
    /// across all topics. Fails with `NotFound` if the topic has no material.
    async fn record_recall(
        &self,
        entry: &RecallEntry,
        cards: &[Flashcard],
        schedule: &TopicSchedule,
    ) -> Result<u32, CoreError>;
    /// Newest first.
    async fn list_history(&self, topic: &Topic) -> Result<Vec<RecallEntry>, CoreError>;

    // Flashcards
    async fn list_flashcards(&self, topic: &Topic) -> Result<Vec<Flashcard>, CoreError>;
}
