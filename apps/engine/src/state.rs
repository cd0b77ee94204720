use std::sync::Arc;

use crate::ats::{AtsScorer, RuleBasedChecker};
use crate::config::Config;
use crate::tools::{ExecutorSlot, PdfExtractor, TextLayerExtractor, ToolRegistry};

/// Shared application state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only after startup.
    pub registry: Arc<ToolRegistry>,
    /// Owns the executor lifecycle; dispose before exit.
    pub executor: Arc<ExecutorSlot>,
    /// Pluggable ATS scorer. Default: RuleBasedChecker.
    pub scorer: Arc<dyn AtsScorer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_pdf_extractor(config, Arc::new(TextLayerExtractor))
    }

    pub fn with_pdf_extractor(config: Config, pdf: Arc<dyn PdfExtractor>) -> Self {
        let registry = Arc::new(ToolRegistry::builtin(config.sandbox_root.clone(), pdf));
        let executor = Arc::new(ExecutorSlot::new(Arc::clone(&registry), config.executor()));
        let scorer = Arc::new(RuleBasedChecker::new(config.ats()));
        Self {
            config,
            registry,
            executor,
            scorer,
        }
    }
}
