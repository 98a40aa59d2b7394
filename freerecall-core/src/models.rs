use crate::Topic;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type EntryId = Uuid;
pub type CardId = Uuid;

pub const SCORE_MAX: u32 = 100;
pub const EASINESS_DEFAULT: f32 = 2.3;

/// Timestamps go over the wire as RFC 3339 UTC with second precision.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ===== Wire contract =====

/// Body of `POST /upload`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Material {
    pub topic: Topic,
    pub content: String,
}

/// Response of `POST /upload`. Clients ignore it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadAck {
    pub topic: Topic,
}

/// Body of `POST /recall`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecallAttempt {
    pub topic: Topic,
    pub recall_text: String,
}

/// A display-only field: whatever number or string the server sent.
///
/// Formats back out as received, so `2.0` stays `2.0` and an epoch
/// timestamp stays a number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Shown {
    Number(serde_json::Number),
    Text(String),
}

impl Shown {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Shown::Number(n) => n.as_u64(),
            Shown::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Shown::Text(s) => Some(s),
            Shown::Number(_) => None,
        }
    }
}

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shown::Number(n) => write!(f, "{n}"),
            Shown::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for Shown {
    fn from(n: u32) -> Self {
        Shown::Number(n.into())
    }
}

impl From<String> for Shown {
    fn from(s: String) -> Self {
        Shown::Text(s)
    }
}

impl From<&str> for Shown {
    fn from(s: &str) -> Self {
        Shown::Text(s.to_string())
    }
}

/// Response of `POST /recall`.
///
/// `cards_added` and `next_review` are only ever shown, so they are kept as
/// the server sent them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecallResult {
    pub score: f64,
    pub feedback: String,
    pub cards_added: Shown,
    pub next_review: Shown,
}

/// One element of `GET /history/:topic`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub created_at: Shown,
    pub score: f64,
    pub feedback: String,
    pub recall_text: String,
}

// ===== Stored entities =====

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyMaterial {
    pub topic: Topic,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudyMaterial {
    pub fn new(topic: Topic, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            topic,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecallEntry {
    pub id: EntryId,
    pub topic: Topic,
    pub recall_text: String,
    pub feedback: String,
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

impl RecallEntry {
    pub fn new(
        topic: Topic,
        recall_text: impl Into<String>,
        feedback: impl Into<String>,
        score: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic,
            recall_text: recall_text.into(),
            feedback: feedback.into(),
            score,
            created_at,
        }
    }

    pub fn to_record(&self) -> HistoryRecord {
        HistoryRecord {
            created_at: format_timestamp(self.created_at).into(),
            score: f64::from(self.score),
            feedback: self.feedback.clone(),
            recall_text: self.recall_text.clone(),
        }
    }
}

/// Front/back pair proposed by a scorer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flashcard {
    pub id: CardId,
    pub topic: Topic,
    pub front: String,
    pub back: String,
    pub added_to_anki: bool,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn from_draft(topic: Topic, draft: CardDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic,
            front: draft.front,
            back: draft.back,
            added_to_anki: false,
            created_at: now,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TopicSchedule {
    pub topic: Topic,
    pub interval_days: u32,
    pub next_review: DateTime<Utc>,
    pub last_review: Option<DateTime<Utc>>,
    pub easiness: f32,
}

impl TopicSchedule {
    /// Schedule for freshly uploaded material: first review one day out.
    pub fn fresh(topic: Topic, now: DateTime<Utc>) -> Self {
        Self {
            topic,
            interval_days: 1,
            next_review: now + Duration::days(1),
            last_review: None,
            easiness: EASINESS_DEFAULT,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}
