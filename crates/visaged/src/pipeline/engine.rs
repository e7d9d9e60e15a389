//! The four-stage chat pipeline.

use crate::config::Config;
use crate::pipeline::backend::{
    BlendshapeBackend, CompletionBackend, DeliveryBackend, DeliveryStatus, SpeechBackend,
    StageSource,
};
use crate::pipeline::blendshapes::NeuroSyncBlendshapes;
use crate::pipeline::completion::OpenAiCompletion;
use crate::pipeline::delivery::HttpDelivery;
use crate::pipeline::error::PipelineError;
use crate::pipeline::speech::ElevenLabsSpeech;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use visage_common::ChatMessage;

/// Outcome of one pipeline run. Only `response_text` reaches the HTTP
/// caller; the rest records which path each stage took so tests (and logs)
/// can tell live calls from degraded-mode substitutions.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub response_text: String,
    pub speech_source: StageSource,
    pub blendshape_source: StageSource,
    pub delivery: DeliveryStatus,
}

/// Sequential orchestrator over the four stage backends.
///
/// Stages run strictly in order and the first failure aborts the run;
/// partial results are discarded, never salvaged or retried. Each run is
/// independent: the engine holds no per-request state, so concurrent runs
/// need no coordination.
pub struct ChatPipeline {
    completion: Arc<dyn CompletionBackend>,
    speech: Arc<dyn SpeechBackend>,
    blendshapes: Arc<dyn BlendshapeBackend>,
    delivery: Arc<dyn DeliveryBackend>,
}

impl ChatPipeline {
    pub fn new(
        completion: Arc<dyn CompletionBackend>,
        speech: Arc<dyn SpeechBackend>,
        blendshapes: Arc<dyn BlendshapeBackend>,
        delivery: Arc<dyn DeliveryBackend>,
    ) -> Self {
        Self {
            completion,
            speech,
            blendshapes,
            delivery,
        }
    }

    /// Wire the real reqwest-backed adapters from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(OpenAiCompletion::new(
                config.completion_url.clone(),
                config.completion_api_key.clone(),
            )),
            Arc::new(ElevenLabsSpeech::new(
                config.tts_url.clone(),
                config.tts_api_key.clone(),
            )),
            Arc::new(NeuroSyncBlendshapes::new(
                config.blendshape_url.clone(),
                config.blendshape_api_key.clone(),
            )),
            Arc::new(HttpDelivery::new(config.delivery_endpoint.clone())),
        )
    }

    /// The speech backend, for the standalone TTS demo endpoint.
    pub fn speech(&self) -> Arc<dyn SpeechBackend> {
        Arc::clone(&self.speech)
    }

    /// Run the full pipeline for one conversation history.
    pub async fn run(&self, history: &[ChatMessage]) -> Result<PipelineRun, PipelineError> {
        let start = Instant::now();

        let response_text = self.completion.complete(history).await?;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completion stage done"
        );

        let speech = self.speech.synthesize(&response_text).await?;
        info!(
            audio_bytes = speech.audio.len(),
            source = ?speech.source,
            "speech stage done"
        );

        let inferred = self.blendshapes.infer(&speech.audio).await?;
        info!(
            frames = inferred.frames.len(),
            source = ?inferred.source,
            "blendshape stage done"
        );

        let delivery = self.delivery.deliver(&speech.audio, &inferred.frames).await?;
        info!(
            status = ?delivery,
            total_ms = start.elapsed().as_millis() as u64,
            "pipeline done"
        );

        Ok(PipelineRun {
            response_text,
            speech_source: speech.source,
            blendshape_source: inferred.source,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::backend::{FakeBlendshapes, FakeCompletion, FakeDelivery, FakeSpeech};
    use crate::pipeline::error::Stage;

    fn history() -> Vec<ChatMessage> {
        vec![ChatMessage::user("Hi")]
    }

    #[tokio::test]
    async fn text_passes_through_unmodified() {
        let pipeline = ChatPipeline::new(
            Arc::new(FakeCompletion::with_text("Hello!")),
            Arc::new(FakeSpeech::with_audio(b"wav".to_vec())),
            Arc::new(FakeBlendshapes::with_frames(vec![])),
            Arc::new(FakeDelivery::sending()),
        );

        let run = pipeline.run(&history()).await.unwrap();
        assert_eq!(run.response_text, "Hello!");
        assert_eq!(run.speech_source, StageSource::Live);
        assert_eq!(run.delivery, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn speech_failure_stops_before_blendshapes() {
        let blendshapes = Arc::new(FakeBlendshapes::placeholder());
        let delivery = Arc::new(FakeDelivery::sending());
        let pipeline = ChatPipeline::new(
            Arc::new(FakeCompletion::with_text("Hello!")),
            Arc::new(FakeSpeech::failing(503)),
            Arc::clone(&blendshapes) as Arc<dyn BlendshapeBackend>,
            Arc::clone(&delivery) as Arc<dyn DeliveryBackend>,
        );

        let err = pipeline.run(&history()).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Speech);
        assert_eq!(blendshapes.call_count(), 0);
        assert_eq!(delivery.call_count(), 0);
    }

    #[tokio::test]
    async fn delivery_failure_discards_completed_text() {
        let pipeline = ChatPipeline::new(
            Arc::new(FakeCompletion::with_text("Hello!")),
            Arc::new(FakeSpeech::placeholder()),
            Arc::new(FakeBlendshapes::placeholder()),
            Arc::new(FakeDelivery::failing(500)),
        );

        // The completion succeeded, but the run as a whole reports the
        // delivery failure and the text is not salvaged.
        let err = pipeline.run(&history()).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Delivery);
    }
}
