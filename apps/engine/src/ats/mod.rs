// ATS compatibility scoring.
// Implements: resume classification, nine category checks, weighted report.
// Pure and synchronous; callers on an async runtime can invoke it inline.

pub mod checker;
pub mod checks;
pub mod models;
pub mod resume;

pub use checker::{AtsConfig, AtsScorer, RuleBasedChecker};
