use crate::{CoreError, Flashcard, RecallEntry, StudyMaterial, Topic, TopicSchedule};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    materials: RwLock<HashMap<Topic, StudyMaterial>>,
    schedules: RwLock<HashMap<Topic, TopicSchedule>>,
    history: RwLock<HashMap<Topic, Vec<RecallEntry>>>,
    cards: RwLock<Vec<Flashcard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::repo::Store for MemoryStore {
    async fn upsert_material(
        &self,
        topic: &Topic,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<StudyMaterial, CoreError> {
        let mut m = self.materials.write();
        let material = m
            .entry(topic.clone())
            .and_modify(|existing| {
                existing.content = content.to_string();
                existing.updated_at = now;
            })
            .or_insert_with(|| StudyMaterial::new(topic.clone(), content, now));
        Ok(material.clone())
    }

    async fn get_material(&self, topic: &Topic) -> Result<StudyMaterial, CoreError> {
        self.materials
            .read()
            .get(topic)
            .cloned()
            .ok_or(CoreError::NotFound("material"))
    }

    async fn put_schedule(&self, schedule: &TopicSchedule) -> Result<(), CoreError> {
        self.schedules
            .write()
            .insert(schedule.topic.clone(), schedule.clone());
        Ok(())
    }

    async fn get_schedule(&self, topic: &Topic) -> Result<TopicSchedule, CoreError> {
        self.schedules
            .read()
            .get(topic)
            .cloned()
            .ok_or(CoreError::NotFound("schedule"))
    }

    async fn due_topics(&self, now: DateTime<Utc>) -> Result<Vec<Topic>, CoreError> {
        let mut due: Vec<TopicSchedule> = self
            .schedules
            .read()
            .values()
            .filter(|s| s.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| (a.next_review, &a.topic).cmp(&(b.next_review, &b.topic)));
        Ok(due.into_iter().map(|s| s.topic).collect())
    }

    async fn record_recall(
        &self,
        entry: &RecallEntry,
        cards: &[Flashcard],
        schedule: &TopicSchedule,
    ) -> Result<u32, CoreError> {
        // All locks up front; nothing below can fail.
        let materials = self.materials.read();
        let mut history = self.history.write();
        let mut stored = self.cards.write();
        let mut schedules = self.schedules.write();
        if !materials.contains_key(&entry.topic) {
            return Err(CoreError::NotFound("material"));
        }

        history
            .entry(entry.topic.clone())
            .or_default()
            .push(entry.clone());

        let mut added = 0u32;
        for card in cards {
            let dup = stored
                .iter()
                .any(|c| c.front == card.front && c.back == card.back);
            if !dup {
                stored.push(card.clone());
                added += 1;
            }
        }

        schedules.insert(schedule.topic.clone(), schedule.clone());
        Ok(added)
    }

    async fn list_history(&self, topic: &Topic) -> Result<Vec<RecallEntry>, CoreError> {
        let mut v: Vec<RecallEntry> = self
            .history
            .read()
            .get(topic)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default();
        // stable: equal timestamps keep newest-inserted first
        v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(v)
    }

    async fn list_flashcards(&self, topic: &Topic) -> Result<Vec<Flashcard>, CoreError> {
        Ok(self
            .cards
            .read()
            .iter()
            .filter(|c| &c.topic == topic)
            .cloned()
            .collect())
    }
}
