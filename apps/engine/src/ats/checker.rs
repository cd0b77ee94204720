//! ATS Checker: composes the nine category checks into a weighted report.
//!
//! Default: `RuleBasedChecker` (deterministic, stateless, safe to share across threads).
//! `AppState` holds an `Arc<dyn AtsScorer>` so another backend can be swapped in.
//!
//! Every call builds its own issue list from the check outcomes; nothing carries over
//! between calls.

use serde_json::Value;
use tracing::debug;

use crate::ats::checks::{
    char_len, check_contact, check_dates, check_experience, check_file_text_extractable,
    check_fonts_images, check_headers, check_layout, check_length, check_skills, CheckOutcome,
};
use crate::ats::models::{AtsBreakdown, AtsCategory, AtsConfidence, AtsReport};
use crate::ats::resume::ParsedResume;

/// Tunables for the rule-based checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtsConfig {
    pub optimal_length_min: usize,
    pub optimal_length_max: usize,
}

impl Default for AtsConfig {
    fn default() -> Self {
        Self {
            optimal_length_min: 400,
            optimal_length_max: 800,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume for ATS compatibility.
///
/// Carried in `AppState` as `Arc<dyn AtsScorer>`.
pub trait AtsScorer: Send + Sync {
    fn score(&self, resume: &ParsedResume, raw_text: &str) -> AtsReport;

    /// Entry point for untyped inputs. `None` means an empty mapping / empty text.
    fn run(&self, resume_json: Option<&Value>, raw_text: Option<&str>) -> AtsReport {
        let resume = ParsedResume::from_value(resume_json);
        self.score(&resume, raw_text.unwrap_or_default())
    }

    /// Name reported alongside results, for transparency.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedChecker
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RuleBasedChecker {
    config: AtsConfig,
}

impl RuleBasedChecker {
    pub fn new(config: AtsConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, resume: &ParsedResume, raw_text: &str) -> AtsReport {
        let outcomes: [(AtsCategory, CheckOutcome); 9] = [
            (
                AtsCategory::FileTextExtractable,
                check_file_text_extractable(raw_text),
            ),
            (AtsCategory::Layout, check_layout(raw_text)),
            (AtsCategory::Headers, check_headers(resume, raw_text)),
            (AtsCategory::Contact, check_contact(resume, raw_text)),
            (AtsCategory::Skills, check_skills(resume, raw_text)),
            (AtsCategory::Experience, check_experience(resume, raw_text)),
            (AtsCategory::Dates, check_dates(raw_text)),
            (AtsCategory::FontsImages, check_fonts_images(raw_text)),
            (
                AtsCategory::Length,
                check_length(
                    raw_text,
                    self.config.optimal_length_min,
                    self.config.optimal_length_max,
                ),
            ),
        ];

        let mut breakdown = AtsBreakdown::default();
        let mut issues = Vec::new();
        for (category, outcome) in outcomes {
            breakdown.set(category, outcome.score.clamp(0.0, 100.0));
            issues.extend(outcome.issues);
        }

        let score = weighted_score(&breakdown);
        let confidence = determine_confidence(char_len(raw_text));

        debug!(
            score,
            resume_keys = resume.entries().len(),
            issues = issues.len(),
            ?confidence,
            "ATS check complete"
        );

        AtsReport {
            score,
            breakdown,
            issues,
            recommended_actions: Vec::new(),
            confidence,
        }
    }
}

impl AtsScorer for RuleBasedChecker {
    fn score(&self, resume: &ParsedResume, raw_text: &str) -> AtsReport {
        self.check(resume, raw_text)
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

/// Σ(category score × weight), rounded to one decimal place.
pub fn weighted_score(breakdown: &AtsBreakdown) -> f64 {
    let total: f64 = AtsCategory::ALL
        .iter()
        .map(|category| breakdown.get(*category) * category.weight())
        .sum();
    round_one_decimal(total)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Confidence from raw text length (in characters) alone.
pub fn determine_confidence(text_len: usize) -> AtsConfidence {
    if text_len < 200 {
        AtsConfidence::Low
    } else if text_len < 500 {
        AtsConfidence::Medium
    } else {
        AtsConfidence::High
    }
}
