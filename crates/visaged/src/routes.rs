//! API routes for visaged.

use crate::pipeline::{PipelineError, SpeechBackend};
use crate::server::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use visage_common::{ApiInfo, ChatInfo, ChatRequest, ChatResponse, HealthResponse, RootInfo, TtsResponse};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Chat Routes
// ============================================================================

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/api/chat", post(chat).get(chat_info))
}

/// Full processing pipeline: completion → speech → blendshapes → delivery.
/// Only the completion text goes back to the caller.
async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    info!(turns = req.messages.len(), user_message = %req.message, "chat turn");

    let run = state
        .pipeline
        .run(&req.messages)
        .await
        .map_err(pipeline_error_response)?;

    Ok(Json(ChatResponse {
        response: run.response_text,
    }))
}

/// Browser-friendly GET for /api/chat.
async fn chat_info() -> Json<ChatInfo> {
    Json(ChatInfo {
        info: "POST to this endpoint with {'message': str, 'messages': [role/content]} \
               to start a chat pipeline."
            .to_string(),
    })
}

// ============================================================================
// TTS Demo Route
// ============================================================================

#[derive(Debug, Deserialize)]
struct TtsParams {
    #[serde(default)]
    text: String,
}

pub fn tts_routes() -> Router<AppStateArc> {
    Router::new().route("/api/tts", get(tts_demo))
}

/// GET /api/tts?text=Hello — synthesize one utterance and return it
/// base64-encoded for quick testing. Runs only the speech stage, so it
/// works (in degraded mode) without any credentials.
async fn tts_demo(
    State(state): State<AppStateArc>,
    Query(params): Query<TtsParams>,
) -> Result<Json<TtsResponse>, (StatusCode, String)> {
    if params.text.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "missing 'text' query parameter".to_string(),
        ));
    }

    let speech = state
        .pipeline
        .speech()
        .synthesize(&params.text)
        .await
        .map_err(pipeline_error_response)?;

    Ok(Json(TtsResponse {
        audio_base64: STANDARD.encode(&speech.audio),
    }))
}

// ============================================================================
// Health / Info Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api", get(api_root))
}

async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        message: "Visage backend is running!".to_string(),
        endpoints: vec![
            "/api/chat (POST)".to_string(),
            "/api/tts (GET)".to_string(),
            "/health (GET)".to_string(),
        ],
    })
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

async fn api_root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Welcome to the Visage API! Available: /api/chat (POST), \
                  /api/chat (GET for info), /api/tts (GET)"
            .to_string(),
        status: "ok".to_string(),
    })
}

// ============================================================================
// Error mapping
// ============================================================================

/// Collapse any pipeline failure into one caller-visible error response.
/// Which stage failed and what the upstream said is logged here; the caller
/// gets the status class and a readable message, never a retry.
fn pipeline_error_response(err: PipelineError) -> (StatusCode, String) {
    error!(stage = %err.stage(), error = %err, "pipeline failed");
    let status = if err.is_configuration() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, err.to_string())
}
