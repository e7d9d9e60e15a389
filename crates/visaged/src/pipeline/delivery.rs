//! Delivery stage: push audio and frames to the rendering engine.

use crate::pipeline::backend::{DeliveryBackend, DeliveryStatus};
use crate::pipeline::error::{PipelineError, Stage};
use crate::pipeline::REQUEST_TIMEOUT;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::{error, info};
use visage_common::BlendshapeFrame;

#[derive(Serialize)]
struct DeliveryPayload<'a> {
    audio_base64: String,
    blendshapes: &'a [BlendshapeFrame],
}

/// POSTs the synthesized audio and frame sequence to the configured render
/// endpoint. Running without an endpoint is a supported deployment mode,
/// so `None` makes this stage a logged no-op.
pub struct HttpDelivery {
    http_client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpDelivery {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint,
        }
    }
}

#[async_trait]
impl DeliveryBackend for HttpDelivery {
    async fn deliver(
        &self,
        audio: &[u8],
        frames: &[BlendshapeFrame],
    ) -> Result<DeliveryStatus, PipelineError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            info!("DELIVERY_ENDPOINT not set, skipping render delivery");
            return Ok(DeliveryStatus::Skipped);
        };

        let payload = DeliveryPayload {
            audio_base64: STANDARD.encode(audio),
            blendshapes: frames,
        };

        info!(
            audio_bytes = audio.len(),
            frames = frames.len(),
            "delivering to render endpoint"
        );

        let response = self
            .http_client
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|source| PipelineError::Request {
                stage: Stage::Delivery,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, %body, "render endpoint error");
            return Err(PipelineError::Upstream {
                stage: Stage::Delivery,
                status,
                body,
            });
        }

        Ok(DeliveryStatus::Sent)
    }
}
