//! Trait abstraction over the four stage backends.
//!
//! Production code wires the reqwest-backed adapters; test code wires the
//! `Fake*` implementations below, which return canned outcomes and count
//! their calls so tests can assert exactly which stages ran.
//!
//! Degraded mode is an explicit tagged outcome (`StageSource::Placeholder`,
//! `DeliveryStatus::Skipped`) rather than a silently substituted value, so
//! the executed path is always observable.

use crate::pipeline::error::{PipelineError, Stage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use visage_common::{BlendshapeFrame, ChatMessage};

// ============================================================================
// Stage outcomes
// ============================================================================

/// Whether a stage called its upstream service or substituted the fixed
/// placeholder because no credential is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSource {
    Live,
    Placeholder,
}

/// Output of the speech-synthesis stage.
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub audio: Vec<u8>,
    pub source: StageSource,
}

/// Output of the blendshape-inference stage.
#[derive(Debug, Clone)]
pub struct InferredBlendshapes {
    pub frames: Vec<BlendshapeFrame>,
    pub source: StageSource,
}

/// Outcome of the delivery stage. `Skipped` means no endpoint is
/// configured, a valid deployment mode for local testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Skipped,
}

// ============================================================================
// Backend traits
// ============================================================================

/// Stage 1: turn a conversation history into a textual reply.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, PipelineError>;
}

/// Stage 2: turn the reply text into encoded audio.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, PipelineError>;
}

/// Stage 3: turn audio into an ordered sequence of facial animation frames.
#[async_trait]
pub trait BlendshapeBackend: Send + Sync {
    async fn infer(&self, audio: &[u8]) -> Result<InferredBlendshapes, PipelineError>;
}

/// Stage 4: forward audio and frames to the rendering engine.
#[async_trait]
pub trait DeliveryBackend: Send + Sync {
    async fn deliver(
        &self,
        audio: &[u8],
        frames: &[BlendshapeFrame],
    ) -> Result<DeliveryStatus, PipelineError>;
}

// ============================================================================
// Fake backends (deterministic testing)
// ============================================================================

/// Canned outcome shared by the fakes: either a success or an upstream
/// failure with the given status.
#[derive(Debug, Clone)]
enum FakeOutcome<T> {
    Ok(T),
    Upstream { status: u16, body: String },
}

impl<T: Clone> FakeOutcome<T> {
    fn resolve(&self, stage: Stage) -> Result<T, PipelineError> {
        match self {
            FakeOutcome::Ok(value) => Ok(value.clone()),
            FakeOutcome::Upstream { status, body } => Err(PipelineError::Upstream {
                stage,
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// Fake completion backend with a fixed reply or a fixed failure.
pub struct FakeCompletion {
    outcome: FakeOutcome<String>,
    calls: AtomicUsize,
}

impl FakeCompletion {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            outcome: FakeOutcome::Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: FakeOutcome::Upstream {
                status,
                body: "fake completion failure".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for FakeCompletion {
    async fn complete(&self, _history: &[ChatMessage]) -> Result<String, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.resolve(Stage::Completion)
    }
}

/// Fake speech backend returning fixed audio, a placeholder, or a failure.
pub struct FakeSpeech {
    outcome: FakeOutcome<SynthesizedSpeech>,
    calls: AtomicUsize,
}

impl FakeSpeech {
    pub fn with_audio(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            outcome: FakeOutcome::Ok(SynthesizedSpeech {
                audio: audio.into(),
                source: StageSource::Live,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mimics the real adapter's degraded mode.
    pub fn placeholder() -> Self {
        Self {
            outcome: FakeOutcome::Ok(SynthesizedSpeech {
                audio: crate::pipeline::speech::PLACEHOLDER_AUDIO.to_vec(),
                source: StageSource::Placeholder,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: FakeOutcome::Upstream {
                status,
                body: "fake speech failure".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechBackend for FakeSpeech {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.resolve(Stage::Speech)
    }
}

/// Fake blendshape backend returning fixed frames, a placeholder, or a
/// failure.
pub struct FakeBlendshapes {
    outcome: FakeOutcome<InferredBlendshapes>,
    calls: AtomicUsize,
}

impl FakeBlendshapes {
    pub fn with_frames(frames: Vec<BlendshapeFrame>) -> Self {
        Self {
            outcome: FakeOutcome::Ok(InferredBlendshapes {
                frames,
                source: StageSource::Live,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mimics the real adapter's degraded mode.
    pub fn placeholder() -> Self {
        Self {
            outcome: FakeOutcome::Ok(InferredBlendshapes {
                frames: vec![crate::pipeline::blendshapes::placeholder_frame()],
                source: StageSource::Placeholder,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: FakeOutcome::Upstream {
                status,
                body: "fake blendshape failure".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlendshapeBackend for FakeBlendshapes {
    async fn infer(&self, _audio: &[u8]) -> Result<InferredBlendshapes, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.resolve(Stage::Blendshapes)
    }
}

/// Fake delivery backend that records calls and reports a fixed status.
pub struct FakeDelivery {
    outcome: FakeOutcome<DeliveryStatus>,
    calls: AtomicUsize,
}

impl FakeDelivery {
    pub fn sending() -> Self {
        Self {
            outcome: FakeOutcome::Ok(DeliveryStatus::Sent),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mimics the real adapter with no endpoint configured.
    pub fn skipped() -> Self {
        Self {
            outcome: FakeOutcome::Ok(DeliveryStatus::Skipped),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: FakeOutcome::Upstream {
                status,
                body: "fake delivery failure".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryBackend for FakeDelivery {
    async fn deliver(
        &self,
        _audio: &[u8],
        _frames: &[BlendshapeFrame],
    ) -> Result<DeliveryStatus, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.resolve(Stage::Delivery)
    }
}
