//! Response bodies for the daemon's HTTP surface.

use serde::{Deserialize, Serialize};

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootInfo {
    pub message: String,
    pub endpoints: Vec<String>,
}

/// `GET /api`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    pub status: String,
}

/// Browser-friendly `GET /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInfo {
    pub info: String,
}

/// `GET /api/tts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsResponse {
    pub audio_base64: String,
}
