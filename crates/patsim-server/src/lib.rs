//! patsim-server library root.
//!
//! Exposes the router and its wiring so integration tests can drive the
//! HTTP surface with a stub gateway, without binding a socket.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use patsim_cases::CaseCatalog;
use patsim_llm::bedrock::BedrockGateway;
use patsim_llm::gateway::ModelGateway;
use patsim_llm::ollama::OllamaGateway;
use patsim_session::protocol::Simulator;
use patsim_session::registry::SessionRegistry;
use tower_http::cors::{Any, CorsLayer};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use config::{Backend, ServerConfig};
use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/sessions", post(routes::sessions::start_session))
        .route(
            "/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::end_session),
        )
        .route(
            "/sessions/{id}/messages",
            post(routes::sessions::send_message),
        )
        .route("/sessions/{id}/evaluate", post(routes::sessions::evaluate))
        .route("/sessions/{id}/report", get(routes::sessions::export_report))
        .route("/sessions/{id}/chat", post(routes::chat::chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn load_catalog(config: &ServerConfig) -> eyre::Result<CaseCatalog> {
    let catalog = match &config.cases_path {
        Some(path) => CaseCatalog::from_json_file(path)?,
        None => CaseCatalog::builtin(),
    };
    if catalog.is_empty() {
        tracing::warn!("case catalog is empty; every session start will fail");
    }
    Ok(catalog)
}

pub async fn build_gateway(config: &ServerConfig) -> Arc<dyn ModelGateway> {
    match &config.backend {
        Backend::Ollama { host } => Arc::new(OllamaGateway::new(host.clone())),
        Backend::Bedrock { region } => Arc::new(BedrockGateway::from_region(region).await),
    }
}

pub fn build_state(
    config: &ServerConfig,
    catalog: CaseCatalog,
    gateway: Arc<dyn ModelGateway>,
) -> AppState {
    let simulator = Simulator::new(Arc::new(catalog), gateway, config.model.clone())
        .with_request_timeout(config.request_timeout);
    AppState::new(simulator)
}

/// How often the idle sweep runs, capped so short TTLs are still honoured.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically evict sessions idle for longer than `idle_ttl`.
pub fn spawn_session_sweeper(sessions: Arc<SessionRegistry>, idle_ttl: Duration) -> JoinHandle<()> {
    let period = idle_ttl.min(MAX_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle(idle_ttl).await;
            if evicted > 0 {
                tracing::info!(evicted, "evicted idle sessions");
            }
        }
    })
}
