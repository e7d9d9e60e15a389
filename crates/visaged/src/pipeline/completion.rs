//! Completion stage: OpenAI-compatible chat-completions client.

use crate::pipeline::backend::CompletionBackend;
use crate::pipeline::error::{PipelineError, Stage};
use crate::pipeline::REQUEST_TIMEOUT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use visage_common::ChatMessage;

const COMPLETION_MODEL: &str = "gpt-4";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 150;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Chat-completions adapter with bearer auth.
///
/// The credential check happens per call: a daemon without a key still
/// serves its info endpoints, but every chat turn fails fast with
/// `MissingCredential` before any network traffic.
pub struct OpenAiCompletion {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl OpenAiCompletion {
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
impl CompletionBackend for OpenAiCompletion {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, PipelineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PipelineError::MissingCredential("COMPLETION_API_KEY"))?;

        let request = CompletionRequest {
            model: COMPLETION_MODEL,
            messages: history,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        info!(turns = history.len(), model = COMPLETION_MODEL, "completion call");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| PipelineError::Request {
                stage: Stage::Completion,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, %body, "completion service error");
            return Err(PipelineError::Upstream {
                stage: Stage::Completion,
                status,
                body,
            });
        }

        let completion: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| PipelineError::Malformed {
                    stage: Stage::Completion,
                    detail: e.to_string(),
                })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Malformed {
                stage: Stage::Completion,
                detail: "empty choices array".to_string(),
            })?;

        Ok(choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visage_common::Role;

    #[test]
    fn request_body_matches_wire_format() {
        let history = vec![ChatMessage::user("Hi")];
        let request = CompletionRequest {
            model: COMPLETION_MODEL,
            messages: &history,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "Hello!");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_call() {
        // Unroutable URL: reaching it would error differently than the
        // credential check we expect.
        let backend = OpenAiCompletion::new("http://127.0.0.1:1", None);
        let err = backend
            .complete(&[ChatMessage {
                role: Role::User,
                content: "Hi".to_string(),
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingCredential(_)));
    }
}
