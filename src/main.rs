//! duet - CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use duet::{Settings, TextGenerator};

/// Ask the text model a question using the configured key pool.
#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(about = "Ask a question through a pool of model API keys")]
#[command(version)]
struct Cli {
    /// Question to answer
    question: String,

    /// Ask the model to explain its reasoning step by step
    #[arg(long)]
    thinking: bool,

    /// Maximum output tokens (overrides DUET_MAX_TOKENS)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Model identifier (overrides DUET_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Language the assistant answers in (overrides DUET_LANGUAGE)
    #[arg(long)]
    language: Option<String>,

    /// Give up on the whole question after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("duet=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env().context("Failed to load settings")?;
    if let Some(model) = cli.model {
        settings.model = model;
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.max_tokens = max_tokens;
    }
    if let Some(language) = cli.language {
        settings.assistant_language = language;
    }
    debug!(?settings, "Loaded settings");

    let generator =
        TextGenerator::from_settings(&settings).context("Failed to set up text generator")?;

    let generation = generator.generate_text(&cli.question, cli.thinking);
    let outcome = match cli.timeout_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), generation).await {
            Ok(outcome) => outcome,
            Err(_) => bail!("No answer within {} seconds", secs),
        },
        None => generation.await,
    };

    match outcome {
        Ok(answer) => {
            println!("{}", answer);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            debug!("Generation failed: {}", e);
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
