//! Command surface: the host for the scorer and the tool executor.
//!
//! Handlers parse and check their inputs, call into the core and return JSON for
//! stdout. Core outcomes pass through unchanged: a report is never re-scored and a
//! tool's failure reason is never rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tools::files::decode_text;
use crate::tools::ToolArgs;

#[derive(Debug, Parser)]
#[command(name = "elevate", version)]
#[command(about = "ATS resume scoring and sandboxed tool execution")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score extracted resume text for ATS compatibility
    Check {
        /// Plain-text file holding the extracted resume text
        #[arg(long)]
        text: PathBuf,
        /// JSON file holding the parsed resume structure
        #[arg(long)]
        resume: Option<PathBuf>,
    },
    /// List available tools
    Tools,
    /// Show a tool's parameter schema
    Describe {
        tool: String,
    },
    /// Run a tool through the executor
    Run {
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
        /// Timeout in seconds (defaults to TOOL_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// What a command prints, plus the failure reason when the command's own result
/// says it failed.
#[derive(Debug)]
pub struct CommandOutput {
    pub body: Value,
    pub failure: Option<String>,
}

impl CommandOutput {
    fn success(body: Value) -> Self {
        Self {
            body,
            failure: None,
        }
    }
}

pub async fn dispatch(state: &AppState, command: Command) -> Result<CommandOutput, AppError> {
    match command {
        Command::Check { text, resume } => {
            handle_check(state, &text, resume.as_deref()).map(CommandOutput::success)
        }
        Command::Tools => Ok(CommandOutput::success(handle_tools(state))),
        Command::Describe { tool } => handle_describe(state, &tool).map(CommandOutput::success),
        Command::Run {
            tool,
            args,
            timeout,
        } => handle_run(state, &tool, args.as_deref(), timeout).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub fn handle_check(
    state: &AppState,
    text_path: &Path,
    resume_path: Option<&Path>,
) -> Result<Value, AppError> {
    let bytes = fs::read(text_path).map_err(|e| {
        AppError::UnprocessableEntity(format!("cannot read {}: {e}", text_path.display()))
    })?;
    let raw_text = decode_text(&bytes);

    let resume_json = match resume_path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                AppError::UnprocessableEntity(format!("cannot read {}: {e}", path.display()))
            })?;
            let value: Value = serde_json::from_str(&raw).map_err(|e| {
                AppError::Validation(format!("{} is not valid JSON: {e}", path.display()))
            })?;
            Some(value)
        }
        None => None,
    };

    let report = state.scorer.run(resume_json.as_ref(), Some(&raw_text));
    info!(
        backend = state.scorer.backend(),
        score = report.score,
        issues = report.issues.len(),
        "ATS check complete"
    );

    serde_json::to_value(&report).map_err(|e| AppError::Internal(e.into()))
}

pub fn handle_tools(state: &AppState) -> Value {
    serde_json::json!(state.registry.list())
}

pub fn handle_describe(state: &AppState, tool: &str) -> Result<Value, AppError> {
    let info = state
        .registry
        .describe(tool)
        .ok_or_else(|| AppError::NotFound(format!("Tool '{tool}' not found in registry")))?;
    serde_json::to_value(info).map_err(|e| AppError::Internal(e.into()))
}

pub async fn handle_run(
    state: &AppState,
    tool: &str,
    args: Option<&str>,
    timeout: Option<u64>,
) -> Result<CommandOutput, AppError> {
    let args = parse_args(args)?;
    let result = state.executor.run(tool, args, timeout).await;
    let failure = (!result.success).then(|| result.error.clone());
    let body = serde_json::to_value(&result).map_err(|e| AppError::Internal(e.into()))?;
    Ok(CommandOutput { body, failure })
}

fn parse_args(raw: Option<&str>) -> Result<ToolArgs, AppError> {
    let Some(raw) = raw else {
        return Ok(ToolArgs::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Validation("--args must be a JSON object".into())),
        Err(e) => Err(AppError::Validation(format!("--args is not valid JSON: {e}"))),
    }
}
