//! Tool executor: bounded worker pool with a per-call wall-clock timeout.
//!
//! # Execution model
//! Every call first passes registry lookup and parameter validation; neither schedules
//! any work. A valid call then waits for one of `max_workers` permits and runs the
//! handler on tokio's blocking pool, so a CPU-heavy or stuck tool never stalls the
//! async runtime.
//!
//! The deadline covers both the wait for a permit and the run itself. When it fires
//! the caller gets a timeout failure straight away; the blocking task is not
//! interrupted. It keeps its permit until it returns and its result is discarded, so
//! a stuck tool can starve the pool.
//!
//! # Lifecycle
//! [`ToolExecutor::shutdown`] drains in-flight work and then refuses new calls.
//! [`ExecutorSlot`] owns an executor for the application: created on first use,
//! disposed explicitly, recreated transparently if used again.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::tools::registry::{ToolArgs, ToolRegistry, ToolResult};

pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 6;

/// Why a call did not produce the tool's own result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Tool '{0}' not found in registry")]
    NotFound(String),

    #[error("Invalid parameters for tool '{0}'")]
    InvalidParameters(String),

    #[error("Tool '{name}' execution timed out after {secs} seconds")]
    TimedOut { name: String, secs: u64 },

    #[error("Tool execution failed: {0}")]
    Failed(String),

    #[error("Tool executor has been shut down")]
    ShutDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub max_workers: usize,
    pub default_timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    workers: Arc<Semaphore>,
    config: ExecutorConfig,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, config: ExecutorConfig) -> Self {
        let max_workers = config.max_workers.max(1);
        Self {
            registry,
            workers: Arc::new(Semaphore::new(max_workers)),
            config: ExecutorConfig {
                max_workers,
                ..config
            },
        }
    }

    pub fn max_workers(&self) -> usize {
        self.config.max_workers
    }

    pub fn is_shut_down(&self) -> bool {
        self.workers.is_closed()
    }

    /// Runs a tool and folds every outcome into a [`ToolResult`].
    pub async fn run(&self, name: &str, args: ToolArgs, timeout_secs: Option<u64>) -> ToolResult {
        self.try_run(name, args, timeout_secs)
            .await
            .unwrap_or_else(|e| ToolResult::failure(e.to_string()))
    }

    /// Runs a tool. `Ok` carries the tool's own result unchanged, whether it reports
    /// success or failure; `Err` is everything the tool did not decide itself.
    ///
    /// `timeout_secs` falls back to the configured default when `None`.
    pub async fn try_run(
        &self,
        name: &str,
        args: ToolArgs,
        timeout_secs: Option<u64>,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        if !tool.parameters.validate(&args) {
            return Err(ToolError::InvalidParameters(name.to_string()));
        }

        let timeout_secs = timeout_secs.unwrap_or(self.config.default_timeout_secs);
        let handler = Arc::clone(&tool.handler);
        let workers = Arc::clone(&self.workers);
        debug!(tool = name, timeout_secs, "Scheduling tool");

        let job = async move {
            let permit = workers
                .acquire_owned()
                .await
                .map_err(|_| ToolError::ShutDown)?;
            let joined = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                handler.call(&args)
            })
            .await;

            match joined {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(e)) => Err(ToolError::Failed(e.to_string())),
                Err(e) if e.is_panic() => Err(ToolError::Failed(panic_message(e.into_panic()))),
                Err(e) => Err(ToolError::Failed(e.to_string())),
            }
        };

        let outcome = match tokio::time::timeout(Duration::from_secs(timeout_secs), job).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(tool = name, timeout_secs, "Tool execution timed out");
                Err(ToolError::TimedOut {
                    name: name.to_string(),
                    secs: timeout_secs,
                })
            }
        };

        if let Err(ToolError::Failed(reason)) = &outcome {
            error!(tool = name, reason = %reason, "Tool execution failed");
        }
        outcome
    }

    /// Waits for in-flight calls (including timed-out ones still running) and then
    /// refuses new work. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let all = u32::try_from(self.config.max_workers).unwrap_or(u32::MAX);
        match self.workers.acquire_many(all).await {
            Ok(drained) => {
                self.workers.close();
                drop(drained);
                info!(max_workers = self.config.max_workers, "Tool executor shut down");
            }
            Err(_) => debug!("Tool executor already shut down"),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(_) => "tool panicked".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Slot
// ────────────────────────────────────────────────────────────────────────────

/// Holds the application's executor.
pub struct ExecutorSlot {
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    current: Mutex<Option<Arc<ToolExecutor>>>,
}

impl ExecutorSlot {
    pub fn new(registry: Arc<ToolRegistry>, config: ExecutorConfig) -> Self {
        Self {
            registry,
            config,
            current: Mutex::new(None),
        }
    }

    /// The live executor, creating one if none exists or the last one was shut down.
    pub fn get(&self) -> Arc<ToolExecutor> {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|e| e.is_shut_down()) {
            *current = None;
        }
        let executor = current.get_or_insert_with(|| {
            info!(max_workers = self.config.max_workers, "Starting tool executor");
            Arc::new(ToolExecutor::new(Arc::clone(&self.registry), self.config))
        });
        Arc::clone(executor)
    }

    pub fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    pub async fn run(&self, name: &str, args: ToolArgs, timeout_secs: Option<u64>) -> ToolResult {
        self.get().run(name, args, timeout_secs).await
    }

    /// Shuts the current executor down and empties the slot. Idempotent.
    pub async fn dispose(&self) {
        let taken = self.current.lock().take();
        if let Some(executor) = taken {
            debug!(max_workers = executor.max_workers(), "Disposing tool executor");
            executor.shutdown().await;
        }
    }
}
