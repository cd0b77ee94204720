//! ATS report data model: categories, issues, breakdown and the final report.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Categories and weights
// ────────────────────────────────────────────────────────────────────────────

/// The nine independent checks, in the order they run and report issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsCategory {
    FileTextExtractable,
    Layout,
    Headers,
    Contact,
    Skills,
    Experience,
    Dates,
    FontsImages,
    Length,
}

/// Category weights for the overall score. Must sum to 1.0.
pub const CATEGORY_WEIGHTS: &[(AtsCategory, f64)] = &[
    (AtsCategory::FileTextExtractable, 0.15),
    (AtsCategory::Layout, 0.15),
    (AtsCategory::Headers, 0.12),
    (AtsCategory::Contact, 0.10),
    (AtsCategory::Skills, 0.15),
    (AtsCategory::Experience, 0.15),
    (AtsCategory::Dates, 0.08),
    (AtsCategory::FontsImages, 0.05),
    (AtsCategory::Length, 0.05),
];

impl AtsCategory {
    pub const ALL: [AtsCategory; 9] = [
        AtsCategory::FileTextExtractable,
        AtsCategory::Layout,
        AtsCategory::Headers,
        AtsCategory::Contact,
        AtsCategory::Skills,
        AtsCategory::Experience,
        AtsCategory::Dates,
        AtsCategory::FontsImages,
        AtsCategory::Length,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AtsCategory::FileTextExtractable => "file_text_extractable",
            AtsCategory::Layout => "layout",
            AtsCategory::Headers => "headers",
            AtsCategory::Contact => "contact",
            AtsCategory::Skills => "skills",
            AtsCategory::Experience => "experience",
            AtsCategory::Dates => "dates",
            AtsCategory::FontsImages => "fonts_images",
            AtsCategory::Length => "length",
        }
    }

    pub fn weight(&self) -> f64 {
        CATEGORY_WEIGHTS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Issues
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

/// A deficiency detected by one check. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsIssue {
    pub category: AtsCategory,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

impl AtsIssue {
    pub fn new(
        category: AtsCategory,
        severity: Severity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Breakdown and report
// ────────────────────────────────────────────────────────────────────────────

/// Per-category sub-scores, each in [0, 100].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub file_text_extractable: f64,
    pub layout: f64,
    pub headers: f64,
    pub contact: f64,
    pub skills: f64,
    pub experience: f64,
    pub dates: f64,
    pub fonts_images: f64,
    pub length: f64,
}

impl AtsBreakdown {
    pub fn get(&self, category: AtsCategory) -> f64 {
        match category {
            AtsCategory::FileTextExtractable => self.file_text_extractable,
            AtsCategory::Layout => self.layout,
            AtsCategory::Headers => self.headers,
            AtsCategory::Contact => self.contact,
            AtsCategory::Skills => self.skills,
            AtsCategory::Experience => self.experience,
            AtsCategory::Dates => self.dates,
            AtsCategory::FontsImages => self.fonts_images,
            AtsCategory::Length => self.length,
        }
    }

    pub fn set(&mut self, category: AtsCategory, score: f64) {
        let slot = match category {
            AtsCategory::FileTextExtractable => &mut self.file_text_extractable,
            AtsCategory::Layout => &mut self.layout,
            AtsCategory::Headers => &mut self.headers,
            AtsCategory::Contact => &mut self.contact,
            AtsCategory::Skills => &mut self.skills,
            AtsCategory::Experience => &mut self.experience,
            AtsCategory::Dates => &mut self.dates,
            AtsCategory::FontsImages => &mut self.fonts_images,
            AtsCategory::Length => &mut self.length,
        };
        *slot = score;
    }
}

/// Reliability label for a report. Derived from input text volume only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtsConfidence {
    High,
    Medium,
    Low,
}

/// Complete ATS analysis. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    /// Weighted overall score (0 – 100), one decimal place.
    pub score: f64,
    pub breakdown: AtsBreakdown,
    pub issues: Vec<AtsIssue>,
    /// Not populated by the rule-based checker; always empty.
    pub recommended_actions: Vec<String>,
    pub confidence: AtsConfidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9, "Weights summed to {total}");
    }

    #[test]
    fn test_every_category_has_a_weight() {
        for category in AtsCategory::ALL {
            assert!(category.weight() > 0.0, "{} has no weight", category.as_str());
        }
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&AtsCategory::FileTextExtractable).unwrap();
        assert_eq!(json, r#""file_text_extractable""#);
        let json = serde_json::to_string(&AtsCategory::FontsImages).unwrap();
        assert_eq!(json, r#""fonts_images""#);
    }

    #[test]
    fn test_as_str_matches_serde_label() {
        for category in AtsCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json.trim_matches('"'), category.as_str());
        }
    }

    #[test]
    fn test_breakdown_set_then_get() {
        let mut breakdown = AtsBreakdown::default();
        breakdown.set(AtsCategory::Dates, 60.0);
        assert_eq!(breakdown.get(AtsCategory::Dates), 60.0);
        assert_eq!(breakdown.dates, 60.0);
        assert_eq!(breakdown.get(AtsCategory::Length), 0.0);
    }

    #[test]
    fn test_report_serializes_lowercase_labels() {
        let report = AtsReport {
            score: 42.5,
            breakdown: AtsBreakdown::default(),
            issues: vec![AtsIssue::new(
                AtsCategory::Contact,
                Severity::Critical,
                "No contact information found",
                "Add email",
            )],
            recommended_actions: vec![],
            confidence: AtsConfidence::Medium,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["confidence"], "medium");
        assert_eq!(value["issues"][0]["severity"], "critical");
        assert_eq!(value["issues"][0]["category"], "contact");
        assert_eq!(value["breakdown"]["fonts_images"], 0.0);
    }
}
