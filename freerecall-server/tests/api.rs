use async_trait::async_trait;
use axum::{Json, Router};
use freerecall_core::{
    history_endpoint, CardDraft, CoreError, MemoryStore, MockScorer, RecallResult, ScoreReport,
    Scorer, Store, Topic,
};
use freerecall_server::{gemini::GeminiScorer, router, AppState};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

struct NiceScorer;

#[async_trait]
impl Scorer for NiceScorer {
    async fn score(&self, _prompt: &str) -> Result<ScoreReport, CoreError> {
        Ok(ScoreReport {
            score: 80,
            feedback: "Nice".into(),
            flashcards: vec![CardDraft {
                front: "Q1".into(),
                back: "A1".into(),
            }],
        })
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_app(store: Arc<dyn Store>, scorer: Arc<dyn Scorer>, max_upload: usize) -> String {
    serve(router(Arc::new(AppState { store, scorer }), max_upload)).await
}

#[tokio::test]
async fn health_is_ok() {
    let base = spawn_app(Arc::new(MemoryStore::new()), Arc::new(MockScorer), 1024).await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn upload_echoes_topic_and_is_not_due_yet() {
    let base = spawn_app(Arc::new(MemoryStore::new()), Arc::new(MockScorer), 1024).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/upload"))
        .json(&json!({"topic": "Alpha", "content": "Beta"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["topic"], "Alpha");

    let due: Vec<String> = client
        .get(format!("{base}/due"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(due.is_empty());
}

#[tokio::test]
async fn upload_validation_and_size_limit() {
    let base = spawn_app(Arc::new(MemoryStore::new()), Arc::new(MockScorer), 64).await;
    let client = reqwest::Client::new();

    let blank = client
        .post(format!("{base}/upload"))
        .json(&json!({"topic": "", "content": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let big = client
        .post(format!("{base}/upload"))
        .json(&json!({"topic": "t", "content": "x".repeat(500)}))
        .send()
        .await
        .unwrap();
    assert_eq!(big.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn recall_unknown_topic_is_404() {
    let base = spawn_app(Arc::new(MemoryStore::new()), Arc::new(MockScorer), 1024).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/recall"))
        .json(&json!({"topic": "unknown", "recall_text": "test"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recall_flow_updates_history_schedule_and_cards() {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_app(store.clone(), Arc::new(NiceScorer), 1024).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/upload"))
        .json(&json!({"topic": "C++ basics", "content": "content"}))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let result: RecallResult = client
        .post(format!("{base}/recall"))
        .json(&json!({"topic": "C++ basics", "recall_text": "some recall"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result.score, 80.0);
    assert_eq!(result.feedback, "Nice");
    assert_eq!(result.cards_added.as_u64(), Some(1));
    assert!(result.next_review.as_str().is_some_and(|s| !s.is_empty()));

    let topic = Topic::new("C++ basics");
    assert_eq!(store.get_schedule(&topic).await.unwrap().interval_days, 2);
    assert_eq!(store.list_flashcards(&topic).await.unwrap().len(), 1);

    let history: Vec<Value> = client
        .get(format!("{base}/history/C%2B%2B%20basics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["recall_text"], "some recall");
    assert_eq!(history[0]["feedback"], "Nice");
    assert!(history[0]["created_at"].is_string());
}

#[tokio::test]
async fn history_for_unknown_topic_is_empty() {
    let base = spawn_app(Arc::new(MemoryStore::new()), Arc::new(MockScorer), 1024).await;
    let history: Vec<Value> = reqwest::get(format!("{base}/history/nothing"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn history_route_matches_client_endpoint() {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_app(store, Arc::new(NiceScorer), 1024).await;
    let client = reqwest::Client::new();
    let topic = Topic::new("a/b c");

    client
        .post(format!("{base}/upload"))
        .json(&json!({"topic": topic, "content": "content"}))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();
    client
        .post(format!("{base}/recall"))
        .json(&json!({"topic": topic, "recall_text": "r"}))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let resp = client
        .get(format!("{base}{}", history_endpoint(&topic)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn gemini_scorer_reads_stubbed_reply() {
    let stub = Router::new().fallback(|| async {
        Json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"score\": 65, \"feedback\": \"half\", \"flashcards\": []}"}]}
            }]
        }))
    });
    let base = serve(stub).await;

    let scorer = GeminiScorer::new("key", "test-model").with_endpoint(format!("{base}/models"));
    let report = scorer.score("prompt").await.unwrap();
    assert_eq!(report.score, 65);
    assert_eq!(report.feedback, "half");
}
