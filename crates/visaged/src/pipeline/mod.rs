//! Chat pipeline orchestration.
//!
//! Flow, strictly sequential:
//! 1. Completion — conversation history in, reply text out
//! 2. Speech synthesis — reply text in, encoded audio out
//! 3. Blendshape inference — audio in, facial animation frames out
//! 4. Delivery — audio + frames pushed to the rendering engine
//!
//! Invariants:
//! - The first failing stage aborts the run; later stages never execute.
//! - No retries, no partial-result salvage.
//! - Stages 2 and 3 substitute fixed placeholders when unconfigured;
//!   stage 4 becomes a no-op. Only the completion credential is required.
//! - Every outbound call is bounded by `REQUEST_TIMEOUT`.

use std::time::Duration;

pub mod backend;
pub mod blendshapes;
pub mod completion;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod speech;

/// Bound on every outbound call. Exceeding it aborts the pipeline exactly
/// like an upstream failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub use backend::{
    BlendshapeBackend, CompletionBackend, DeliveryBackend, DeliveryStatus, InferredBlendshapes,
    SpeechBackend, StageSource, SynthesizedSpeech,
};
pub use engine::{ChatPipeline, PipelineRun};
pub use error::{PipelineError, Stage};

// Real adapters
pub use blendshapes::NeuroSyncBlendshapes;
pub use completion::OpenAiCompletion;
pub use delivery::HttpDelivery;
pub use speech::ElevenLabsSpeech;

// Fakes - for deterministic testing
pub use backend::{FakeBlendshapes, FakeCompletion, FakeDelivery, FakeSpeech};
