//! Visage Control - CLI client for the visaged daemon.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visagectl")]
#[command(about = "Visage - interactive avatar backend control", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the visaged daemon
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon health
    Status,

    /// Send one chat turn through the full pipeline
    Chat {
        /// The message to send
        message: String,
    },

    /// Synthesize one utterance via the TTS demo endpoint
    Tts {
        /// Text to synthesize
        text: String,

        /// Write the decoded audio to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => commands::status(&cli.url).await,
        Commands::Chat { message } => commands::chat(&cli.url, &message).await,
        Commands::Tts { text, output } => commands::tts(&cli.url, &text, output.as_deref()).await,
    }
}
