mod ats;
mod commands;
mod config;
mod errors;
mod state;
mod tools;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{dispatch, Cli};
use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        sandbox = %config.sandbox_root.display(),
        workers = config.tool_workers,
        "Starting elevate"
    );

    let state = AppState::new(config);
    let outcome = dispatch(&state, cli.command).await;

    // Report first; a timed-out tool may still hold a worker during the drain
    let failure = match outcome {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output.body)?);
            output.failure.map(AppError::ToolFailed)
        }
        Err(e) => Some(e),
    };
    if let Some(err) = &failure {
        eprintln!("{}", serde_json::to_string_pretty(&err.to_json())?);
    }

    if state.executor.is_active() {
        state.executor.dispose().await;
    }

    if let Some(err) = failure {
        std::process::exit(err.exit_code());
    }
    Ok(())
}
