//! HTTP surface.
//!
//! A thin axum router over the relay handler: one POST route per writing
//! module, plus model listing and a health probe. Module endpoints always
//! answer `200 OK`; errors travel in-band as `{"error": ...}` objects the
//! browser client renders directly.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State},
    routing::{get, post},
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::error::{DraftpilotError, Result};
use crate::handler::{ModelsReply, RelayReply, relay_models, relay_module};
use crate::modules::Module;

/// Shared per-process state handed to every route.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Truncation limits for the context builder.
    pub limits: crate::config::LimitsConfig,
    /// Outbound HTTP settings for provider calls.
    pub network: crate::config::NetworkConfig,
}

impl AppState {
    /// Builds route state from the loaded configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            limits: config.limits.clone(),
            network: config.network.clone(),
        }
    }
}

/// Builds the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/topic", post(api_topic))
        .route("/api/outline", post(api_outline))
        .route("/api/draft", post(api_draft))
        .route("/api/polish", post(api_polish))
        .route("/api/search-refs", post(api_search))
        .route("/api/insert-refs", post(api_citations))
        .route("/api/models", post(api_models))
        .route("/health", get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Binds the listener and serves until a shutdown signal arrives.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let bind_address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| {
            DraftpilotError::Config(format!(
                "invalid listen address '{}': {}",
                bind_address, e
            ))
        })?;

    tracing::info!(
        "{}",
        rust_i18n::t!("server.listening", addr = bind_address.as_str())
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Graceful shutdown on SIGTERM and Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("{}", rust_i18n::t!("server.shutdown"));
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn relay(state: &AppState, module: Module, payload: Value) -> Json<RelayReply> {
    Json(relay_module(module, &payload, &state.limits, &state.network).await)
}

async fn api_topic(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<RelayReply> {
    relay(&state, Module::Topic, payload).await
}

async fn api_outline(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<RelayReply> {
    relay(&state, Module::Outline, payload).await
}

async fn api_draft(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<RelayReply> {
    relay(&state, Module::Draft, payload).await
}

async fn api_polish(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<RelayReply> {
    relay(&state, Module::Polish, payload).await
}

async fn api_search(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<RelayReply> {
    relay(&state, Module::Search, payload).await
}

async fn api_citations(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<RelayReply> {
    relay(&state, Module::Citations, payload).await
}

async fn api_models(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<ModelsReply> {
    Json(relay_models(&payload, &state.network).await)
}
