//! Error taxonomy for the chat pipeline.
//!
//! Three failure classes, none retried:
//! - a required credential is missing (fatal configuration problem),
//! - an upstream service answered with a non-success status,
//! - the request itself failed in transit (timeouts land here too).
//!
//! Malformed upstream bodies get their own variant so the failing stage
//! stays identifiable, but callers treat them like any upstream failure.

use std::fmt;
use thiserror::Error;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Completion,
    Speech,
    Blendshapes,
    Delivery,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Completion => "completion",
            Stage::Speech => "speech",
            Stage::Blendshapes => "blendshapes",
            Stage::Delivery => "delivery",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required environment variable is not set. Surfaced as a server
    /// error; degraded-mode stages never produce this.
    #[error("{0} is not set")]
    MissingCredential(&'static str),

    /// An upstream service returned a non-success status.
    #[error("{stage} service returned {status}: {body}")]
    Upstream {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// The outbound request failed before a response arrived. Timeout
    /// expiry surfaces here and aborts the pipeline like any other
    /// upstream failure.
    #[error("{stage} request failed: {source}")]
    Request {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered 2xx but the body did not have the expected
    /// shape.
    #[error("{stage} returned an unexpected response: {detail}")]
    Malformed { stage: Stage, detail: String },
}

impl PipelineError {
    /// The stage that failed. The only missing credential that is fatal is
    /// the completion key, so `MissingCredential` maps to that stage.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MissingCredential(_) => Stage::Completion,
            PipelineError::Upstream { stage, .. } => *stage,
            PipelineError::Request { stage, .. } => *stage,
            PipelineError::Malformed { stage, .. } => *stage,
        }
    }

    /// Whether the failure is a local configuration problem rather than an
    /// upstream one. Drives the HTTP status the handler reports.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PipelineError::MissingCredential(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_is_lowercase() {
        assert_eq!(Stage::Completion.to_string(), "completion");
        assert_eq!(Stage::Blendshapes.to_string(), "blendshapes");
    }

    #[test]
    fn upstream_error_names_stage_and_status() {
        let err = PipelineError::Upstream {
            stage: Stage::Speech,
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.stage(), Stage::Speech);
        assert!(!err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("speech"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn missing_credential_is_configuration() {
        let err = PipelineError::MissingCredential("COMPLETION_API_KEY");
        assert!(err.is_configuration());
        assert_eq!(err.stage(), Stage::Completion);
        assert_eq!(err.to_string(), "COMPLETION_API_KEY is not set");
    }
}
