//! Blendshape-inference stage: audio-to-face client.

use crate::pipeline::backend::{BlendshapeBackend, InferredBlendshapes, StageSource};
use crate::pipeline::error::{PipelineError, Stage};
use crate::pipeline::REQUEST_TIMEOUT;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use visage_common::BlendshapeFrame;

const BLENDSHAPE_MODEL: &str = "NEUROSYNC_Audio_To_Face_Blendshape";

/// Degraded-mode substitute: one frame, mouth half open.
pub fn placeholder_frame() -> BlendshapeFrame {
    BlendshapeFrame::new(0).with_weight("mouthOpen", 0.5)
}

#[derive(Serialize)]
struct BlendshapeRequest<'a> {
    audio_base64: String,
    model: &'a str,
}

#[derive(Deserialize)]
struct BlendshapeResponse {
    blendshapes: Vec<BlendshapeFrame>,
}

/// Audio-to-face adapter. Audio goes out base64-encoded with bearer auth;
/// the response carries the ordered frame sequence.
pub struct NeuroSyncBlendshapes {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl NeuroSyncBlendshapes {
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
impl BlendshapeBackend for NeuroSyncBlendshapes {
    async fn infer(&self, audio: &[u8]) -> Result<InferredBlendshapes, PipelineError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("BLENDSHAPE_API_KEY not set, returning placeholder frame");
            return Ok(InferredBlendshapes {
                frames: vec![placeholder_frame()],
                source: StageSource::Placeholder,
            });
        };

        let request = BlendshapeRequest {
            audio_base64: STANDARD.encode(audio),
            model: BLENDSHAPE_MODEL,
        };

        info!(audio_bytes = audio.len(), "blendshape inference call");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| PipelineError::Request {
                stage: Stage::Blendshapes,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, %body, "blendshape service error");
            return Err(PipelineError::Upstream {
                stage: Stage::Blendshapes,
                status,
                body,
            });
        }

        let parsed: BlendshapeResponse =
            response
                .json()
                .await
                .map_err(|e| PipelineError::Malformed {
                    stage: Stage::Blendshapes,
                    detail: e.to_string(),
                })?;

        Ok(InferredBlendshapes {
            frames: parsed.blendshapes,
            source: StageSource::Live,
        })
    }
}
