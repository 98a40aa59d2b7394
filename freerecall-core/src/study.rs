//! Server-side workflows behind `/upload` and `/recall`.

use crate::{
    apply_score, build_prompt, format_timestamp, CoreError, Flashcard, Material, RecallAttempt,
    RecallEntry, RecallResult, Scorer, Store, StudyMaterial, TopicSchedule,
};
use chrono::{DateTime, Utc};

/// Store (or replace) material and restart its schedule.
///
/// Repeating an upload for the same topic is idempotent apart from the
/// content and timestamps it refreshes.
pub async fn upload_material<S: Store + ?Sized>(
    store: &S,
    material: &Material,
    now: DateTime<Utc>,
) -> Result<StudyMaterial, CoreError> {
    if material.topic.is_blank() {
        return Err(CoreError::Invalid("topic is required"));
    }
    if material.content.trim().is_empty() {
        return Err(CoreError::Invalid("content is required"));
    }
    let stored = store
        .upsert_material(&material.topic, &material.content, now)
        .await?;
    store
        .put_schedule(&TopicSchedule::fresh(material.topic.clone(), now))
        .await?;
    Ok(stored)
}

/// Grade an attempt, then record it with its new flashcards and next review in one store write.
pub async fn score_recall<S, L>(
    store: &S,
    scorer: &L,
    attempt: &RecallAttempt,
    now: DateTime<Utc>,
) -> Result<RecallResult, CoreError>
where
    S: Store + ?Sized,
    L: Scorer + ?Sized,
{
    if attempt.recall_text.trim().is_empty() {
        return Err(CoreError::Invalid("recall_text is required"));
    }
    let material = store.get_material(&attempt.topic).await?;

    let prompt = build_prompt(&material, &attempt.recall_text);
    let report = scorer.score(&prompt).await?.validate()?;

    let entry = RecallEntry::new(
        attempt.topic.clone(),
        attempt.recall_text.clone(),
        report.feedback.clone(),
        report.score,
        now,
    );
    let cards: Vec<Flashcard> = report
        .flashcards
        .into_iter()
        .map(|d| Flashcard::from_draft(attempt.topic.clone(), d, now))
        .collect();

    let schedule = match store.get_schedule(&attempt.topic).await {
        Ok(s) => s,
        Err(CoreError::NotFound(_)) => TopicSchedule::fresh(attempt.topic.clone(), now),
        Err(e) => return Err(e),
    };
    let schedule = apply_score(schedule, report.score, now);

    let cards_added = store.record_recall(&entry, &cards, &schedule).await?;

    Ok(RecallResult {
        score: f64::from(report.score),
        feedback: report.feedback,
        cards_added: cards_added.into(),
        next_review: format_timestamp(schedule.next_review).into(),
    })
}
