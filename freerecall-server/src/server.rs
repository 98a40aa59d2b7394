use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use freerecall_core::{
    CoreError, MemoryStore, MockScorer, Scorer, Store, DUE_PATH, HEALTH_PATH, HISTORY_PATH,
    RECALL_PATH, UPLOAD_PATH,
};
use freerecall_sqlite::SqliteStore;

use crate::config::{ConfigError, LlmProvider, ServerConfig, StoreKind};
use crate::gemini::GeminiScorer;
use crate::routes::{due, health, history, recall, upload, AppState};

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(
            UPLOAD_PATH,
            post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(DUE_PATH, get(due))
        .route(RECALL_PATH, post(recall))
        .route(&format!("{HISTORY_PATH}/:topic"), get(history))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn Store>, CoreError> {
    match config.store {
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreKind::Sqlite => {
            if let Some(parent) = config.db_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    warn!("cannot create data dir {}: {e}", parent.display());
                    CoreError::Storage("create data dir")
                })?;
            }
            let s = SqliteStore::open_file(&config.db_path).await?;
            Ok(Arc::new(s))
        }
    }
}

pub fn build_scorer(config: &ServerConfig) -> Result<Arc<dyn Scorer>, ConfigError> {
    match config.llm_provider {
        LlmProvider::Mock => Ok(Arc::new(MockScorer)),
        LlmProvider::Gemini => {
            let key = config
                .gemini_api_key
                .clone()
                .ok_or(ConfigError::MissingGeminiKey)?;
            Ok(Arc::new(GeminiScorer::new(key, config.model_name.clone())))
        }
    }
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!("Initializing state...");
    let store = open_store(&config).await?;
    let scorer = build_scorer(&config)?;
    let state = Arc::new(AppState { store, scorer });

    let app = router(state, config.max_upload_bytes);

    info!("Binding to {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        store = ?config.store,
        provider = ?config.llm_provider,
        "Server running on {}",
        config.addr
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with_db(db: &std::path::Path) -> ServerConfig {
        let vars: HashMap<&str, String> =
            HashMap::from([("FREERECALL_DB", db.display().to_string())]);
        ServerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap()
    }

    #[tokio::test]
    async fn unwritable_data_dir_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let config = config_with_db(&blocker.join("nested").join("freerecall.sqlite3"));
        let err = open_store(&config).await.err().unwrap();
        assert!(matches!(err, CoreError::Storage("create data dir")));
    }

    #[tokio::test]
    async fn creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("a").join("b").join("freerecall.sqlite3");
        open_store(&config_with_db(&db)).await.unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
