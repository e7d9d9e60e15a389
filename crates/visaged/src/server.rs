//! HTTP server for visaged.

use crate::config::Config;
use crate::pipeline::ChatPipeline;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            start_time: Instant::now(),
        }
    }
}

/// Build the router. Exported separately so tests can drive it with
/// `tower::ServiceExt::oneshot` against fake backends.
pub fn app(state: Arc<AppState>) -> Router {
    // Allow-all CORS: the browser frontend is served from a different
    // origin in every deployment this backend targets.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::chat_routes())
        .merge(routes::tts_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the HTTP server until the process is stopped.
pub async fn run(config: Config) -> Result<()> {
    let state = Arc::new(AppState::new(ChatPipeline::from_config(&config)));
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
