use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use freerecall_core::{
    score_recall, upload_material, HistoryRecord, Material, RecallAttempt, RecallResult, Scorer,
    Store, Topic, UploadAck,
};

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub scorer: Arc<dyn Scorer>,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn upload(
    State(st): State<Arc<AppState>>,
    Json(body): Json<Material>,
) -> Result<Json<UploadAck>, AppError> {
    let stored = upload_material(&*st.store, &body, Utc::now()).await?;
    info!(topic = %stored.topic, bytes = stored.content.len(), "material uploaded");
    Ok(Json(UploadAck {
        topic: stored.topic,
    }))
}

pub async fn due(State(st): State<Arc<AppState>>) -> Result<Json<Vec<Topic>>, AppError> {
    let topics = st.store.due_topics(Utc::now()).await?;
    debug!(count = topics.len(), "due topics");
    Ok(Json(topics))
}

pub async fn recall(
    State(st): State<Arc<AppState>>,
    Json(body): Json<RecallAttempt>,
) -> Result<Json<RecallResult>, AppError> {
    let result = score_recall(&*st.store, &*st.scorer, &body, Utc::now()).await?;
    info!(
        topic = %body.topic,
        score = result.score,
        cards_added = %result.cards_added,
        "recall scored"
    );
    Ok(Json(result))
}

pub async fn history(
    State(st): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Result<Json<Vec<HistoryRecord>>, AppError> {
    let entries = st.store.list_history(&Topic::new(topic)).await?;
    Ok(Json(entries.iter().map(|e| e.to_record()).collect()))
}
