//! Reference server for the FreeRecall study contract.
//!
//! Serves `/upload`, `/due`, `/recall`, `/history/:topic` and `/health` over a
//! [`Store`](freerecall_core::Store) and a [`Scorer`](freerecall_core::Scorer).
//! Everything is configured from the environment, see [`config::ServerConfig`].

pub mod config;
pub mod error;
pub mod gemini;
pub mod paths;
pub mod routes;
pub mod server;

pub use config::{ConfigError, LlmProvider, ServerConfig, StoreKind};
pub use error::AppError;
pub use routes::AppState;
pub use server::{build_scorer, open_store, router, run};
