//! Visage daemon: HTTP orchestration backend for an interactive streaming
//! avatar.
//!
//! One inbound chat turn drives four dependent outbound calls — LLM
//! completion, speech synthesis, blendshape inference, render delivery —
//! and returns the completion text to the caller.

pub mod config;
pub mod pipeline;
pub mod routes;
pub mod server;
