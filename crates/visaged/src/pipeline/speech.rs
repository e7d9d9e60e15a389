//! Speech-synthesis stage: ElevenLabs-style text-to-speech client.

use crate::pipeline::backend::{SpeechBackend, StageSource, SynthesizedSpeech};
use crate::pipeline::error::{PipelineError, Stage};
use crate::pipeline::REQUEST_TIMEOUT;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

/// Fixed audio payload substituted when no TTS credential is configured.
/// Downstream stages always receive some audio value.
pub const PLACEHOLDER_AUDIO: &[u8] = b"DUMMY_AUDIO_DATA";

const SPEECH_MODEL_ID: &str = "eleven_monolingual_v1";
const STABILITY: f32 = 0.5;
const SIMILARITY_BOOST: f32 = 0.5;

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Text-to-speech adapter. The credential travels in the provider's
/// `xi-api-key` header; the response body is raw encoded audio.
///
/// Missing credential is degraded mode, not an error: the adapter returns
/// the fixed placeholder so the rest of the pipeline can run without a
/// full set of provider accounts.
pub struct ElevenLabsSpeech {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl ElevenLabsSpeech {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SpeechBackend for ElevenLabsSpeech {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, PipelineError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("TTS_API_KEY not set, returning placeholder audio");
            return Ok(SynthesizedSpeech {
                audio: PLACEHOLDER_AUDIO.to_vec(),
                source: StageSource::Placeholder,
            });
        };

        let request = SpeechRequest {
            text,
            model_id: SPEECH_MODEL_ID,
            voice_settings: VoiceSettings {
                stability: STABILITY,
                similarity_boost: SIMILARITY_BOOST,
            },
        };

        info!(chars = text.len(), "speech synthesis call");

        let response = self
            .http_client
            .post(&self.url)
            .header("xi-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| PipelineError::Request {
                stage: Stage::Speech,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, %body, "speech service error");
            return Err(PipelineError::Upstream {
                stage: Stage::Speech,
                status,
                body,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|source| PipelineError::Request {
                stage: Stage::Speech,
                source,
            })?;

        Ok(SynthesizedSpeech {
            audio: audio.to_vec(),
            source: StageSource::Live,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_format() {
        let request = SpeechRequest {
            text: "Hello!",
            model_id: SPEECH_MODEL_ID,
            voice_settings: VoiceSettings {
                stability: STABILITY,
                similarity_boost: SIMILARITY_BOOST,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "Hello!");
        assert_eq!(json["model_id"], "eleven_monolingual_v1");
        assert!((json["voice_settings"]["stability"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn missing_key_yields_placeholder_without_network() {
        let backend = ElevenLabsSpeech::new("http://127.0.0.1:1", None);
        let speech = backend.synthesize("Hello!").await.unwrap();
        assert_eq!(speech.source, StageSource::Placeholder);
        assert_eq!(speech.audio, PLACEHOLDER_AUDIO);
    }
}
