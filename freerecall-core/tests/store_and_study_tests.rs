use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use freerecall_core::{
    score_recall, upload_material, CardDraft, CoreError, Flashcard, Material, MemoryStore,
    RecallAttempt, RecallEntry, ScoreReport, Scorer, Store, StudyMaterial, Topic, TopicSchedule,
};
use pretty_assertions::assert_eq;

struct FixedScorer(ScoreReport);

#[async_trait]
impl Scorer for FixedScorer {
    async fn score(&self, _prompt: &str) -> Result<ScoreReport, CoreError> {
        Ok(self.0.clone())
    }
}

fn material(topic: &str, content: &str) -> Material {
    Material {
        topic: Topic::new(topic),
        content: content.to_string(),
    }
}

fn nice_with_card() -> FixedScorer {
    FixedScorer(ScoreReport {
        score: 80,
        feedback: "Nice".into(),
        flashcards: vec![CardDraft {
            front: "Q1".into(),
            back: "A1".into(),
        }],
    })
}

#[tokio::test]
async fn upload_is_not_due_until_tomorrow() {
    let store = MemoryStore::new();
    let now = Utc::now();
    upload_material(&store, &material("Alpha", "Beta"), now).await.unwrap();

    assert!(store.due_topics(now).await.unwrap().is_empty());
    assert_eq!(
        store.due_topics(now + Duration::days(1)).await.unwrap(),
        vec![Topic::new("Alpha")]
    );
}

#[tokio::test]
async fn repeated_upload_replaces_content() {
    let store = MemoryStore::new();
    let t0 = Utc::now();
    upload_material(&store, &material("Alpha", "v1"), t0).await.unwrap();
    let t1 = t0 + Duration::minutes(5);
    upload_material(&store, &material("Alpha", "v2"), t1).await.unwrap();

    let m = store.get_material(&Topic::new("Alpha")).await.unwrap();
    assert_eq!(m.content, "v2");
    assert_eq!(m.created_at, t0);
    assert_eq!(m.updated_at, t1);
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let err = upload_material(&store, &material("  ", "x"), now).await.unwrap_err();
    assert!(matches!(err, CoreError::Invalid(_)));
    let err = upload_material(&store, &material("t", ""), now).await.unwrap_err();
    assert!(matches!(err, CoreError::Invalid(_)));
}

#[tokio::test]
async fn recall_on_unknown_topic_is_not_found() {
    let store = MemoryStore::new();
    let attempt = RecallAttempt {
        topic: Topic::new("unknown"),
        recall_text: "test".into(),
    };
    let err = score_recall(&store, &nice_with_card(), &attempt, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn recall_records_history_cards_and_schedule() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let topic = Topic::new("Alpha");
    upload_material(&store, &material("Alpha", "content"), now).await.unwrap();

    let attempt = RecallAttempt {
        topic: topic.clone(),
        recall_text: "some recall".into(),
    };
    let res = score_recall(&store, &nice_with_card(), &attempt, now).await.unwrap();
    assert_eq!(res.score, 80.0);
    assert_eq!(res.feedback, "Nice");
    assert_eq!(res.cards_added.as_u64(), Some(1));
    assert!(res.next_review.as_str().is_some_and(|s| !s.is_empty()));

    assert_eq!(store.list_history(&topic).await.unwrap().len(), 1);
    assert_eq!(store.get_schedule(&topic).await.unwrap().interval_days, 2);
    assert_eq!(store.list_flashcards(&topic).await.unwrap().len(), 1);

    // same card again is not new
    let again = score_recall(&store, &nice_with_card(), &attempt, now).await.unwrap();
    assert_eq!(again.cards_added.as_u64(), Some(0));
    assert_eq!(store.list_history(&topic).await.unwrap().len(), 2);
}

#[tokio::test]
async fn history_is_newest_first() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let topic = Topic::new("Alpha");
    store.upsert_material(&topic, "c", now).await.unwrap();

    let older = RecallEntry::new(topic.clone(), "first", "ok", 50, now - Duration::days(1));
    let newer = RecallEntry::new(topic.clone(), "second", "better", 90, now);
    let schedule = TopicSchedule::fresh(topic.clone(), now);
    store.record_recall(&older, &[], &schedule).await.unwrap();
    store.record_recall(&newer, &[], &schedule).await.unwrap();

    let texts: Vec<String> = store
        .list_history(&topic)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.recall_text)
        .collect();
    assert_eq!(texts, vec!["second".to_string(), "first".to_string()]);
    assert!(store.list_history(&Topic::new("none")).await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_score_fails_without_recording() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let topic = Topic::new("Alpha");
    upload_material(&store, &material("Alpha", "content"), now).await.unwrap();

    let scorer = FixedScorer(ScoreReport {
        score: 250,
        feedback: String::new(),
        flashcards: vec![],
    });
    let attempt = RecallAttempt {
        topic: topic.clone(),
        recall_text: "x".into(),
    };
    let err = score_recall(&store, &scorer, &attempt, now).await.unwrap_err();
    assert!(matches!(err, CoreError::Scoring(_)));
    assert!(store.list_history(&topic).await.unwrap().is_empty());
}

#[tokio::test]
async fn record_recall_without_material_writes_nothing() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let topic = Topic::new("ghost");
    let entry = RecallEntry::new(topic.clone(), "x", "y", 90, now);
    let card = Flashcard::from_draft(
        topic.clone(),
        CardDraft {
            front: "Q".into(),
            back: "A".into(),
        },
        now,
    );
    let schedule = TopicSchedule::fresh(topic.clone(), now);

    let err = store
        .record_recall(&entry, &[card], &schedule)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
    assert!(store.list_history(&topic).await.unwrap().is_empty());
    assert!(store.list_flashcards(&topic).await.unwrap().is_empty());
    assert!(store.get_schedule(&topic).await.is_err());
}

/// Delegates to a `MemoryStore` but cannot persist a scored attempt.
struct FullDisk(MemoryStore);

#[async_trait]
impl Store for FullDisk {
    async fn upsert_material(
        &self,
        topic: &Topic,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<StudyMaterial, CoreError> {
        self.0.upsert_material(topic, content, now).await
    }
    async fn get_material(&self, topic: &Topic) -> Result<StudyMaterial, CoreError> {
        self.0.get_material(topic).await
    }
    async fn put_schedule(&self, schedule: &TopicSchedule) -> Result<(), CoreError> {
        self.0.put_schedule(schedule).await
    }
    async fn get_schedule(&self, topic: &Topic) -> Result<TopicSchedule, CoreError> {
        self.0.get_schedule(topic).await
    }
    async fn due_topics(&self, now: DateTime<Utc>) -> Result<Vec<Topic>, CoreError> {
        self.0.due_topics(now).await
    }
    async fn record_recall(
        &self,
        _entry: &RecallEntry,
        _cards: &[Flashcard],
        _schedule: &TopicSchedule,
    ) -> Result<u32, CoreError> {
        Err(CoreError::Storage("disk full"))
    }
    async fn list_history(&self, topic: &Topic) -> Result<Vec<RecallEntry>, CoreError> {
        self.0.list_history(topic).await
    }
    async fn list_flashcards(&self, topic: &Topic) -> Result<Vec<Flashcard>, CoreError> {
        self.0.list_flashcards(topic).await
    }
}

#[tokio::test]
async fn failed_recall_write_leaves_history_and_schedule_alone() {
    let store = FullDisk(MemoryStore::new());
    let now = Utc::now();
    let topic = Topic::new("Alpha");
    upload_material(&store, &material("Alpha", "content"), now).await.unwrap();
    let before = store.get_schedule(&topic).await.unwrap();

    let attempt = RecallAttempt {
        topic: topic.clone(),
        recall_text: "some recall".into(),
    };
    let err = score_recall(&store, &nice_with_card(), &attempt, now)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));

    assert!(store.list_history(&topic).await.unwrap().is_empty());
    assert!(store.list_flashcards(&topic).await.unwrap().is_empty());
    assert_eq!(store.get_schedule(&topic).await.unwrap(), before);
}
