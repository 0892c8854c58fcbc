//! Lexis Gateway - HTTP surface of the sentiment engine.
//!
//! - Submission: analyze texts and store results by identifier
//! - Display: fetch stored results
//! - Moderation: JWT-authenticated label corrections that feed learning
//!
//! ```text
//! Client → Gateway (body limit → cors → [moderator auth]) → SentimentEngine
//!                                                               ↓
//!                                                   AdaptiveStore / ResultStore
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod auth;
pub mod routes;

pub use auth::{AuthState, AuthUser, Claims};
pub use routes::{build_routes, ApiError, AppState, ErrorResponse};

use anyhow::Context;
use axum::Router;
use lexis_common::{Config, StorageBackend};
use lexis_core::{
    AdaptiveStore, BuiltinLexicon, EngineSettings, InMemoryStore, ResultStore, SentimentEngine,
    SqliteStore,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Open the configured lexicon and storage backend and start the engine.
pub async fn build_engine(config: &Config) -> anyhow::Result<SentimentEngine> {
    let builtin = match config.lexicon.resolved_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading lexicon definition");
            BuiltinLexicon::from_json_file(&path)?
        }
        None => BuiltinLexicon::bundled()?,
    };

    let (adaptive, results): (Arc<dyn AdaptiveStore>, Arc<dyn ResultStore>) = match config.storage.backend {
        StorageBackend::Sqlite => {
            let path = config.storage.resolved_path();
            let store = Arc::new(
                SqliteStore::open(&path)
                    .with_context(|| format!("Failed to open SQLite store at {}", path.display()))?,
            );
            (store.clone(), store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; learned terms are lost on exit");
            let store = Arc::new(InMemoryStore::new());
            (store.clone(), store)
        }
    };

    let engine = SentimentEngine::open(builtin, EngineSettings::from_config(config), adaptive, results).await?;
    Ok(engine)
}

/// Build the gateway router with all routes and middleware.
pub fn build_router(config: &Config, engine: Arc<SentimentEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::build_routes(engine, AuthState::from_config(&config.auth))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(cors)
}

/// Start the gateway server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = config.server_address()?;

    let engine = Arc::new(build_engine(config).await?);
    let router = build_router(config, engine);

    tracing::info!("Starting Lexis Gateway on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Lexis Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
