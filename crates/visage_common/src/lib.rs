//! Shared wire types for Visage.
//!
//! Everything the daemon and the CLI exchange over HTTP lives here:
//! conversation turns, blendshape frames, and the API response bodies.

pub mod api;
pub mod blendshapes;
pub mod chat;

pub use api::{ApiInfo, ChatInfo, HealthResponse, RootInfo, TtsResponse};
pub use blendshapes::BlendshapeFrame;
pub use chat::{ChatMessage, ChatRequest, ChatResponse, Role};
