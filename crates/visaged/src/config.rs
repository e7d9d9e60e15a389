//! Environment-driven configuration for the daemon.
//!
//! Credentials are optional by design: a missing speech or blendshape key
//! puts that stage into degraded mode, and a missing delivery endpoint
//! disables delivery entirely. Only the completion key is required, and it
//! is enforced per request rather than at startup so the info and health
//! endpoints stay usable on an unconfigured box.

use std::env;

/// Default bind address, matching the original deployment.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default upstream endpoints. Overridable per deployment (and in tests,
/// which point the adapters at local fake services).
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TTS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech/voice_id";
pub const DEFAULT_BLENDSHAPE_URL: &str = "https://api.neurosync.ai/audio-to-face";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub completion_api_key: Option<String>,
    pub completion_url: String,
    pub tts_api_key: Option<String>,
    pub tts_url: String,
    pub blendshape_api_key: Option<String>,
    pub blendshape_url: String,
    pub delivery_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            completion_api_key: None,
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            tts_api_key: None,
            tts_url: DEFAULT_TTS_URL.to_string(),
            blendshape_api_key: None,
            blendshape_url: DEFAULT_BLENDSHAPE_URL.to_string(),
            delivery_endpoint: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment. An empty value counts as
    /// unset so that `FOO=` in a unit file behaves like an absent variable.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("VISAGED_ADDR", DEFAULT_BIND_ADDR),
            completion_api_key: env_opt("COMPLETION_API_KEY"),
            completion_url: env_or("COMPLETION_API_URL", DEFAULT_COMPLETION_URL),
            tts_api_key: env_opt("TTS_API_KEY"),
            tts_url: env_or("TTS_API_URL", DEFAULT_TTS_URL),
            blendshape_api_key: env_opt("BLENDSHAPE_API_KEY"),
            blendshape_url: env_or("BLENDSHAPE_API_URL", DEFAULT_BLENDSHAPE_URL),
            delivery_endpoint: env_opt("DELIVERY_ENDPOINT"),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}
