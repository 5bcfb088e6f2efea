//! HTTP surface for the Orim canvas agent.
//!
//! - `GET /health`: liveness plus the configured model
//! - `POST /chat`: runs one chat request and streams NDJSON events
//!
//! Built on Axum.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::StreamExt;
use orim_agent::{ChatRequest, ChatService};
use orim_config::{AppConfig, GatewayConfig};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

pub const NDJSON: &str = "application/x-ndjson";

/// Shared application state, built once at startup.
pub struct AppState {
    pub chat: ChatService,
    pub model: String,
    pub has_model_key: bool,
}

impl AppState {
    pub fn new(chat: ChatService, config: &AppConfig) -> Self {
        Self {
            chat,
            model: config.default_model.clone(),
            has_model_key: config.has_model_key(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ChatService::from_config(config), config)
    }
}

pub type SharedState = Arc<AppState>;

/// Build the router with both routes and the HTTP layers.
pub fn build_router(state: SharedState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(gateway.max_body_bytes))
        .layer(cors_layer(&gateway.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Any origin when none are configured; invalid entries are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Start the HTTP server and serve until the process stops.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(AppState::from_config(&config));

    if !state.has_model_key {
        warn!("No valid Anthropic key (expected sk-ant-...), chat requests will fail");
    }

    let app = build_router(state.clone(), &config.gateway);

    info!(addr = %addr, model = %state.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: &'static str,
    model: String,
    has_model_key: bool,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: orim_telemetry::model::BACKEND,
        model: state.model.clone(),
        has_model_key: state.has_model_key,
    })
}

/// Malformed bodies are rejected by the `Json` extractor before any
/// stream exists. Past that point the status is always 200.
async fn chat_handler(State(state): State<SharedState>, Json(request): Json<ChatRequest>) -> Response {
    let stream = state.chat.stream(request).await;
    let body = Body::from_stream(stream.lines.map(Ok::<_, Infallible>));
    ([(header::CONTENT_TYPE, NDJSON)], body).into_response()
}
