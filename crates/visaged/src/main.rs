//! Visage daemon entry point.

use anyhow::Result;
use tracing::{info, Level};
use visaged::config::Config;
use visaged::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("visaged v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    if config.completion_api_key.is_none() {
        info!("COMPLETION_API_KEY not set - chat turns will fail until it is configured");
    }

    server::run(config).await
}
