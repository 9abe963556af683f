//! # Server Setup
//!
//! Tracing initialization, shared state, router construction and startup.

// region: --- Imports
use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use shared::constants::{CHAT_PATH, DEFAULT_GREETING};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::assistant::{Assistant, GenAiAssistant};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers;
use crate::leads::LeadBook;
use crate::middleware::{log_requests, stamp_req, RequestStamp};
use crate::rate_limit::RateLimiter;
use crate::threads::ThreadRegistry;
// endregion: --- Imports

// region: --- AppState
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub assistant: Arc<dyn Assistant>,
    pub threads: Arc<ThreadRegistry>,
    pub leads: Arc<LeadBook>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, assistant: Arc<dyn Assistant>) -> Result<Self> {
        let leads = LeadBook::new(DEFAULT_GREETING)
            .map_err(|e| AppError::Config(format!("invalid lead pattern: {}", e)))?;

        Ok(Self {
            limiter: Arc::new(RateLimiter::per_hour(config.rate_limit_per_hour)),
            config: Arc::new(config),
            assistant,
            threads: Arc::new(ThreadRegistry::new()),
            leads: Arc::new(leads),
        })
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Assistant> {
    fn from_ref(state: &AppState) -> Self {
        state.assistant.clone()
    }
}

impl FromRef<AppState> for Arc<ThreadRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.threads.clone()
    }
}

impl FromRef<AppState> for Arc<LeadBook> {
    fn from_ref(state: &AppState) -> Self {
        state.leads.clone()
    }
}

impl FromRef<AppState> for Arc<RateLimiter> {
    fn from_ref(state: &AppState) -> Self {
        state.limiter.clone()
    }
}
// endregion: --- AppState

// region: --- Tracing
/// Install the global tracing subscriber, filtered by `LOG_LEVEL`
/// (trace, debug, info, warn, error; default info).
pub fn init_tracing() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {
            tracing_subscriber::EnvFilter::new(&log_level)
        }
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!("Log level: {}", log_level);
    Ok(())
}
// endregion: --- Tracing

// region: --- Server Setup
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("SAMM CHAT BACKEND STARTING");

    let assistant: Arc<dyn Assistant> = Arc::new(GenAiAssistant::new(config.assistant.clone()));
    info!(
        "Assistant: {} (model: {}, context window: {})",
        config.assistant.name, config.assistant.model, config.assistant.context_window
    );

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, assistant)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("SERVER READY: http://{}", bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router: `/chat`, `/health` and the widget bundle.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let public_dir = &state.config.public_dir;
    let static_files =
        ServeDir::new(public_dir).fallback(ServeFile::new(public_dir.join("index.html")));

    Router::new()
        .route(CHAT_PATH, post(handlers::chat::chat))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(static_files)
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
        )
        // Outermost so the stamp is visible to the trace span and the logger
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}

fn log_server_info() {
    info!(" CHAT:");
    info!("   • POST {}  {{ message, user_ip, threadId? }}", CHAT_PATH);
    info!(" HEALTH:");
    info!("   • GET  /health");
    info!(" WIDGET:");
    info!("   • GET  /  (static files)");
}
// endregion: --- Server Setup
