//! Command implementations: thin HTTP calls to the daemon.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;
use visage_common::{ChatMessage, ChatRequest, ChatResponse, HealthResponse, TtsResponse};

/// The chat pipeline itself waits up to 30s per upstream call, so give the
/// daemon room for all four before giving up client-side.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(150);

fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(CLIENT_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}

pub async fn status(url: &str) -> Result<()> {
    let health: HealthResponse = client()?
        .get(format!("{url}/health"))
        .send()
        .await
        .context("daemon not reachable")?
        .error_for_status()
        .context("daemon returned an error")?
        .json()
        .await
        .context("unexpected health response")?;

    println!("{} visaged v{}", "●".green(), health.version);
    println!("  status: {}", health.status);
    println!("  uptime: {}s", health.uptime_seconds);
    Ok(())
}

pub async fn chat(url: &str, message: &str) -> Result<()> {
    let request = ChatRequest {
        message: message.to_string(),
        messages: vec![ChatMessage::user(message)],
    };

    let response = client()?
        .post(format!("{url}/api/chat"))
        .json(&request)
        .send()
        .await
        .context("daemon not reachable")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("chat failed ({status}): {body}");
    }

    let reply: ChatResponse = response.json().await.context("unexpected chat response")?;
    println!("{} {}", "visage:".cyan().bold(), reply.response);
    Ok(())
}

pub async fn tts(url: &str, text: &str, output: Option<&Path>) -> Result<()> {
    let body: TtsResponse = client()?
        .get(format!("{url}/api/tts"))
        .query(&[("text", text)])
        .send()
        .await
        .context("daemon not reachable")?
        .error_for_status()
        .context("synthesis failed")?
        .json()
        .await
        .context("unexpected TTS response")?;

    let audio = STANDARD
        .decode(body.audio_base64.as_bytes())
        .context("daemon returned invalid base64 audio")?;

    match output {
        Some(path) => {
            std::fs::write(path, &audio)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} wrote {} bytes to {}",
                "ok".green(),
                audio.len(),
                path.display()
            );
        }
        None => {
            println!("{} synthesized {} bytes of audio", "ok".green(), audio.len());
        }
    }
    Ok(())
}
