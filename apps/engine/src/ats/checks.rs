//! The nine ATS category checks.
//!
//! Each check is a pure function of `(resume, raw_text)` returning a score in [0, 100]
//! plus the issues it found. The checker composes them; no check keeps state.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ats::models::{AtsCategory, AtsIssue, Severity};
use crate::ats::resume::{ContactKind, ParsedResume};

/// Result of a single category check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub score: f64,
    pub issues: Vec<AtsIssue>,
}

impl CheckOutcome {
    fn clean(score: f64) -> Self {
        Self {
            score,
            issues: vec![],
        }
    }

    fn with_issue(score: f64, issue: AtsIssue) -> Self {
        Self {
            score,
            issues: vec![issue],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabularies
// ────────────────────────────────────────────────────────────────────────────

const ATS_HEADERS: &[&str] = &[
    "contact",
    "personal information",
    "contact information",
    "summary",
    "professional summary",
    "objective",
    "profile",
    "experience",
    "work experience",
    "employment",
    "professional experience",
    "education",
    "academic background",
    "qualifications",
    "skills",
    "technical skills",
    "core competencies",
    "expertise",
    "certifications",
    "certificates",
    "licenses",
    "projects",
    "portfolio",
    "achievements",
    "accomplishments",
];

const SKILL_KEYWORDS: &[&str] = &[
    // Technical
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "django",
    "flask",
    "spring",
    "laravel",
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "elasticsearch",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "jenkins",
    "git",
    "github",
    "gitlab",
    "ci/cd",
    "devops",
    "agile",
    "scrum",
    // Soft
    "leadership",
    "teamwork",
    "communication",
    "problem solving",
    "project management",
    "time management",
    "analytical",
    "creative",
    "collaboration",
    "mentoring",
    "training",
    "presentation",
];

const GARBLED_INDICATORS: &[&str] = &["cid:", "\u{0}", "\u{fffd}"];

const TABLE_INDICATORS: &[char] = &['|', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴'];

const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "work", "employment", "job", "position", "role"];

const IMAGE_INDICATORS: &[&str] = &["image", "img", "photo", "picture", "logo", "graphic"];

const SPECIAL_CHARS: &[char] = &['©', '®', '™', '◦', '▪', '▫', '◆', '◇', '★', '☆'];

// ────────────────────────────────────────────────────────────────────────────
// Patterns
// ────────────────────────────────────────────────────────────────────────────

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?1[-.\s]?)?(\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4})")
        .expect("valid phone regex")
});

/// City-state, two words, or an `address:` / `location:` prefix. First hit wins.
///
/// All three are case-insensitive, so the two-word form accepts any pair of words.
static LOCATION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b[A-Z][a-z]+,\s*[A-Z]{2}\b",
        r"(?i)\b[A-Z][a-z]+\s+[A-Z][a-z]+\b",
        r"(?i)\b(address|location):\s*[^\n]+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid location regex"))
    .collect()
});

/// "at Company". Applied to the lowercased text along with the title pattern, where
/// the capital-letter class cannot match; only the title words contribute.
static COMPANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(at|@)\s+[A-Z][a-zA-Z\s&]+").expect("valid company regex"));

/// Job-title words, matched against the lowercased text.
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(software|engineer|developer|manager|analyst|specialist|coordinator|director|lead|senior|junior)\b",
    )
    .expect("valid title regex")
});

static DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(19|20)\d{2}\b",
        r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{4}\b",
        r"(?i)\b\d{1,2}[/-]\d{4}\b",
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid date regex"))
    .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn count_substrings(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().map(|n| haystack.matches(n).count()).sum()
}

fn count_chars(haystack: &str, needles: &[char]) -> usize {
    haystack.chars().filter(|c| needles.contains(c)).count()
}

fn format_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.into_iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

// ────────────────────────────────────────────────────────────────────────────
// Checks
// ────────────────────────────────────────────────────────────────────────────

pub fn check_file_text_extractable(raw_text: &str) -> CheckOutcome {
    let category = AtsCategory::FileTextExtractable;

    if char_len(raw_text.trim()) < 50 {
        return CheckOutcome::with_issue(
            0.0,
            AtsIssue::new(
                category,
                Severity::Critical,
                "Resume text is too short or unreadable",
                "Ensure the resume file is properly formatted and contains sufficient content",
            ),
        );
    }

    let garbled_count = count_substrings(raw_text, GARBLED_INDICATORS);
    if garbled_count as f64 > char_len(raw_text) as f64 * 0.05 {
        return CheckOutcome::with_issue(
            30.0,
            AtsIssue::new(
                category,
                Severity::Major,
                format!("Text contains {garbled_count} encoding issues"),
                "Re-save the resume in a standard format (PDF or DOCX)",
            ),
        );
    }

    let words = word_count(raw_text);
    if words < 100 {
        return CheckOutcome::with_issue(
            60.0,
            AtsIssue::new(
                category,
                Severity::Major,
                format!("Resume has only {words} words"),
                "Add more detailed content to your resume",
            ),
        );
    }

    CheckOutcome::clean(100.0)
}

pub fn check_layout(raw_text: &str) -> CheckOutcome {
    let category = AtsCategory::Layout;
    let mut score = 100.0;
    let mut issues = Vec::new();

    if count_chars(raw_text, TABLE_INDICATORS) > 10 {
        issues.push(AtsIssue::new(
            category,
            Severity::Major,
            "Resume contains complex table formatting",
            "Use simple bullet points and standard formatting instead of tables",
        ));
        score -= 30.0;
    }

    let newlines = raw_text.matches('\n').count() as f64;
    if raw_text.contains("  ") && newlines < word_count(raw_text) as f64 * 0.1 {
        issues.push(AtsIssue::new(
            category,
            Severity::Minor,
            "Resume may use column formatting",
            "Use single-column layout for better ATS compatibility",
        ));
        score -= 10.0;
    }

    let non_empty_lines = raw_text.split('\n').filter(|l| !l.trim().is_empty()).count();
    if non_empty_lines < 10 {
        issues.push(AtsIssue::new(
            category,
            Severity::Major,
            "Resume has insufficient structure",
            "Add proper sections and line breaks",
        ));
        score -= 20.0;
    }

    CheckOutcome {
        score: f64::max(0.0, score),
        issues,
    }
}

pub fn check_headers(resume: &ParsedResume, raw_text: &str) -> CheckOutcome {
    let text_lower = raw_text.to_lowercase();

    let mut found: BTreeSet<String> = ATS_HEADERS
        .iter()
        .filter(|h| text_lower.contains(*h))
        .map(|h| h.to_string())
        .collect();
    found.extend(resume.keys_lowercase().filter(|k| ATS_HEADERS.contains(&k.as_str())));

    let score = match found.len() {
        n if n >= 5 => 100.0,
        n if n >= 3 => 80.0,
        2 => 60.0,
        1 => 40.0,
        _ => 0.0,
    };

    if found.len() < 3 {
        return CheckOutcome::with_issue(
            score,
            AtsIssue::new(
                AtsCategory::Headers,
                Severity::Major,
                format!(
                    "Missing important section headers. Found: {}",
                    format_list(found.iter().map(String::as_str))
                ),
                "Add clear section headers like: experience, skills, education",
            ),
        );
    }

    CheckOutcome::clean(score)
}

pub fn check_contact(resume: &ParsedResume, raw_text: &str) -> CheckOutcome {
    let mut found: Vec<&'static str> = Vec::new();
    let mut score = 0.0;

    if EMAIL_RE.is_match(raw_text) {
        found.push(ContactKind::Email.as_str());
        score += 30.0;
    }

    if PHONE_RE.is_match(raw_text) {
        found.push(ContactKind::Phone.as_str());
        score += 30.0;
    }

    if LOCATION_RES.iter().any(|re| re.is_match(raw_text)) {
        found.push(ContactKind::Location.as_str());
        score += 20.0;
    }

    for kind in resume.contact_kinds() {
        if !found.contains(&kind.as_str()) {
            found.push(kind.as_str());
            score += 20.0;
        }
    }

    let category = AtsCategory::Contact;
    let issue = if found.is_empty() {
        Some(AtsIssue::new(
            category,
            Severity::Critical,
            "No contact information found",
            "Add email, phone number, and location to your resume",
        ))
    } else if found.len() < 2 {
        Some(AtsIssue::new(
            category,
            Severity::Major,
            format!("Limited contact information. Found: {}", format_list(found.iter().copied())),
            "Add missing contact details (email, phone, location)",
        ))
    } else {
        None
    };

    CheckOutcome {
        score: f64::min(100.0, score),
        issues: issue.into_iter().collect(),
    }
}

pub fn check_skills(resume: &ParsedResume, raw_text: &str) -> CheckOutcome {
    let text_lower = raw_text.to_lowercase();

    let mut found: BTreeSet<String> = SKILL_KEYWORDS
        .iter()
        .filter(|s| text_lower.contains(*s))
        .map(|s| s.to_string())
        .collect();
    if let Some(field) = resume.skills() {
        found.extend(field.tokens());
    }

    let score = match found.len() {
        n if n >= 10 => 100.0,
        n if n >= 7 => 80.0,
        n if n >= 5 => 60.0,
        n if n >= 3 => 40.0,
        n if n >= 1 => 20.0,
        _ => 0.0,
    };

    if found.len() < 5 {
        return CheckOutcome::with_issue(
            score,
            AtsIssue::new(
                AtsCategory::Skills,
                Severity::Major,
                format!(
                    "Limited skills identified. Found: {} relevant skills",
                    found.len()
                ),
                "Add more specific technical and soft skills to your resume",
            ),
        );
    }

    CheckOutcome::clean(score)
}

pub fn check_experience(resume: &ParsedResume, raw_text: &str) -> CheckOutcome {
    let text_lower = raw_text.to_lowercase();
    let mut score = 0.0;

    if EXPERIENCE_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
        score += 30.0;
    }

    let pattern_matches =
        COMPANY_RE.find_iter(&text_lower).count() + TITLE_RE.find_iter(&text_lower).count();
    score += match pattern_matches {
        n if n >= 5 => 40.0,
        n if n >= 3 => 30.0,
        n if n >= 1 => 20.0,
        _ => 0.0,
    };

    if resume.has_experience_entries() {
        score += 30.0;
    }

    if score < 50.0 {
        return CheckOutcome::with_issue(
            score,
            AtsIssue::new(
                AtsCategory::Experience,
                Severity::Major,
                "Work experience section is unclear or missing",
                "Add a clear work experience section with job titles, companies, and dates",
            ),
        );
    }

    CheckOutcome::clean(f64::min(100.0, score))
}

pub fn check_dates(raw_text: &str) -> CheckOutcome {
    let total: usize = DATE_RES.iter().map(|re| re.find_iter(raw_text).count()).sum();

    let score = match total {
        n if n >= 6 => 100.0,
        n if n >= 4 => 80.0,
        n if n >= 2 => 60.0,
        1 => 40.0,
        _ => 0.0,
    };

    if total < 2 {
        return CheckOutcome::with_issue(
            score,
            AtsIssue::new(
                AtsCategory::Dates,
                Severity::Major,
                format!("Limited date information found ({total} dates)"),
                "Add dates for education, work experience, and certifications",
            ),
        );
    }

    CheckOutcome::clean(score)
}

pub fn check_fonts_images(raw_text: &str) -> CheckOutcome {
    let category = AtsCategory::FontsImages;
    let mut score = 100.0;
    let mut issues = Vec::new();

    let image_count = count_substrings(&raw_text.to_lowercase(), IMAGE_INDICATORS);
    if image_count > 0 {
        issues.push(AtsIssue::new(
            category,
            Severity::Minor,
            format!("Found {image_count} potential image references"),
            "Avoid images, logos, or graphics in your resume for better ATS compatibility",
        ));
        score -= 20.0;
    }

    let special_count = count_chars(raw_text, SPECIAL_CHARS);
    if special_count > 5 {
        issues.push(AtsIssue::new(
            category,
            Severity::Minor,
            format!("Found {special_count} special characters"),
            "Use standard bullet points and characters for better ATS compatibility",
        ));
        score -= 10.0;
    }

    CheckOutcome {
        score: f64::max(0.0, score),
        issues,
    }
}

pub fn check_length(raw_text: &str, min_words: usize, max_words: usize) -> CheckOutcome {
    let words = word_count(raw_text);

    if (min_words..=max_words).contains(&words) {
        CheckOutcome::clean(100.0)
    } else if words < min_words {
        CheckOutcome::with_issue(
            60.0,
            AtsIssue::new(
                AtsCategory::Length,
                Severity::Major,
                format!("Resume is too short ({words} words)"),
                format!("Aim for {min_words}-{max_words} words for optimal length"),
            ),
        )
    } else {
        CheckOutcome::with_issue(
            80.0,
            AtsIssue::new(
                AtsCategory::Length,
                Severity::Minor,
                format!("Resume is long ({words} words)"),
                format!("Consider condensing to {max_words} words or less"),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty() -> ParsedResume {
        ParsedResume::default()
    }

    fn lines(n: usize, line: &str) -> String {
        vec![line; n].join("\n")
    }

    // ── file_text_extractable ──

    #[test]
    fn test_extractable_short_text_is_critical() {
        let outcome = check_file_text_extractable("   too short   ");
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_extractable_garbled_text_scores_30() {
        let text = format!("{}{}", "(cid:12)".repeat(20), " word".repeat(20));
        let outcome = check_file_text_extractable(&text);
        assert_eq!(outcome.score, 30.0);
        assert_eq!(outcome.issues[0].severity, Severity::Major);
        assert!(outcome.issues[0].message.contains("20 encoding issues"));
    }

    #[test]
    fn test_extractable_few_words_scores_60() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let outcome = check_file_text_extractable(text);
        assert_eq!(outcome.score, 60.0);
        assert!(outcome.issues[0].message.contains("12 words"));
    }

    #[test]
    fn test_extractable_full_text_scores_100() {
        let text = "word ".repeat(150);
        let outcome = check_file_text_extractable(&text);
        assert_eq!(outcome.score, 100.0);
        assert!(outcome.issues.is_empty());
    }

    // ── layout ──

    #[test]
    fn test_layout_clean_text_scores_100() {
        let text = lines(12, "Built services in Rust");
        let outcome = check_layout(&text);
        assert_eq!(outcome.score, 100.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_layout_tables_penalized() {
        let text = lines(12, "| a | b | c |");
        let outcome = check_layout(&text);
        assert_eq!(outcome.score, 70.0);
        assert!(outcome.issues[0].message.contains("table"));
    }

    #[test]
    fn test_layout_columns_penalized() {
        // Double spaces and one newline across many words.
        let text = format!("{}\n{}", "left  right ".repeat(100), lines(10, "row"));
        let words = word_count(&text) as f64;
        assert!((text.matches('\n').count() as f64) < words * 0.1);
        let outcome = check_layout(&text);
        assert_eq!(outcome.score, 90.0);
        assert_eq!(outcome.issues[0].severity, Severity::Minor);
    }

    #[test]
    fn test_layout_penalties_stack() {
        let text = "┌┐└┘├┤┬┴||||  one line only with many words in it right here";
        let outcome = check_layout(text);
        assert_eq!(outcome.score, 40.0);
        assert_eq!(outcome.issues.len(), 3);
    }

    // ── headers ──

    #[test]
    fn test_headers_counts_distinct_text_and_keys() {
        let resume = ParsedResume::from_value(Some(&json!({"Education": [], "projects": []})));
        let outcome = check_headers(&resume, "SUMMARY\nSKILLS\nEDUCATION");
        // summary, skills, education, projects
        assert_eq!(outcome.score, 80.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_headers_five_or_more_scores_100() {
        let text = "Contact\nSummary\nExperience\nEducation\nSkills";
        assert_eq!(check_headers(&empty(), text).score, 100.0);
    }

    #[test]
    fn test_headers_few_found_lists_them() {
        let outcome = check_headers(&empty(), "Skills: Rust");
        assert_eq!(outcome.score, 40.0);
        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.issues[0].message.contains("'skills'"));
    }

    #[test]
    fn test_headers_none_found_scores_zero() {
        let outcome = check_headers(&empty(), "nothing relevant here");
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.issues[0].message.ends_with("Found: []"));
    }

    // ── contact ──

    #[test]
    fn test_contact_full_text_detection() {
        let text = "jane.doe@example.com | (555) 123-4567 | Austin, TX";
        let outcome = check_contact(&empty(), text);
        assert_eq!(outcome.score, 80.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_contact_nothing_found_is_critical() {
        let outcome = check_contact(&empty(), "nothing");
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_contact_any_two_words_read_as_location() {
        let outcome = check_contact(&empty(), "no details here at all");
        assert_eq!(outcome.score, 20.0);
        assert_eq!(outcome.issues[0].severity, Severity::Major);
        assert!(outcome.issues[0].message.contains("'location'"));
    }

    #[test]
    fn test_contact_city_state_is_case_insensitive() {
        assert_eq!(check_contact(&empty(), "austin,tx").score, 20.0);
    }

    #[test]
    fn test_contact_location_prefix_needs_a_word() {
        let outcome = check_contact(&empty(), "location: --");
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_contact_single_type_is_major() {
        let outcome = check_contact(&empty(), "someone@example.org");
        assert_eq!(outcome.score, 30.0);
        assert_eq!(outcome.issues[0].severity, Severity::Major);
        assert!(outcome.issues[0].message.contains("'email'"));
    }

    #[test]
    fn test_contact_location_prefix_is_case_insensitive() {
        let outcome = check_contact(&empty(), "LOCATION: remote");
        assert_eq!(outcome.score, 20.0);
    }

    #[test]
    fn test_contact_json_adds_only_new_kinds() {
        let resume = ParsedResume::from_value(Some(&json!({
            "email": "x@y.com",
            "address": "1 Main St",
            "contact": {}
        })));
        // email from text; address and contact are new from JSON.
        let outcome = check_contact(&resume, "x@y.com");
        assert_eq!(outcome.score, 70.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_contact_capped_at_100() {
        let resume = ParsedResume::from_value(Some(&json!({
            "address": "1 Main St",
            "contact": {}
        })));
        let text = "a@b.com 555-123-4567 Austin, TX";
        assert_eq!(check_contact(&resume, text).score, 100.0);
    }

    // ── skills ──

    #[test]
    fn test_skills_ten_distinct_scores_100() {
        let text = "python java docker kubernetes aws git sql redis agile leadership";
        let outcome = check_skills(&empty(), text);
        assert_eq!(outcome.score, 100.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_skills_json_list_merged_and_deduped() {
        let resume = ParsedResume::from_value(Some(&json!({"skills": ["Python", "Rust", "Go"]})));
        let outcome = check_skills(&resume, "python");
        // python, rust, go
        assert_eq!(outcome.score, 40.0);
        assert!(outcome.issues[0].message.contains("Found: 3"));
    }

    #[test]
    fn test_skills_none_scores_zero() {
        let outcome = check_skills(&empty(), "nothing");
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.issues.len(), 1);
    }

    // ── experience ──

    #[test]
    fn test_experience_keyword_and_titles() {
        let text = "Experience\nSenior Software Engineer at Acme Corp\nLead Developer\nJunior Analyst";
        let outcome = check_experience(&empty(), text);
        assert_eq!(outcome.score, 70.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_experience_company_phrase_adds_nothing() {
        // Only "software" and "engineer" count; "at Acme" does not.
        let outcome = check_experience(&empty(), "Software Engineer at Acme");
        assert_eq!(outcome.score, 20.0);
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn test_experience_json_list_adds_30() {
        let resume = ParsedResume::from_value(Some(&json!({"jobs": [{"title": "x"}]})));
        let outcome = check_experience(&resume, "Experience\nSoftware Engineer");
        // keyword 30 + two titles 20 + json 30
        assert_eq!(outcome.score, 80.0);
    }

    #[test]
    fn test_experience_missing_is_major() {
        let outcome = check_experience(&empty(), "hobbies: chess");
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.issues[0].severity, Severity::Major);
    }

    #[test]
    fn test_experience_capped_at_100() {
        let resume = ParsedResume::from_value(Some(&json!({"experience": [1]})));
        let text = "work experience senior lead engineer developer manager analyst";
        assert_eq!(check_experience(&resume, text).score, 100.0);
    }

    // ── dates ──

    #[test]
    fn test_dates_counts_all_families_without_dedup() {
        // "Jan 2020" hits both the month-abbrev and the bare-year pattern.
        let outcome = check_dates("Jan 2020 - March 2022, 05/2019");
        // years: 2020, 2022, 2019 = 3; abbrev: Jan 2020, March 2022 = 2; mm/yyyy: 1; full: March 2022 = 1
        assert_eq!(outcome.score, 100.0);
    }

    #[test]
    fn test_dates_single_is_major() {
        let outcome = check_dates("Graduated 2015");
        assert_eq!(outcome.score, 40.0);
        assert!(outcome.issues[0].message.contains("(1 dates)"));
    }

    #[test]
    fn test_dates_out_of_range_years_ignored() {
        assert_eq!(check_dates("1850 2150 3000").score, 0.0);
    }

    // ── fonts_images ──

    #[test]
    fn test_fonts_images_clean() {
        let outcome = check_fonts_images("plain resume text");
        assert_eq!(outcome.score, 100.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_fonts_images_flat_penalty_for_images() {
        let outcome = check_fonts_images("Logo logo LOGO photo picture");
        assert_eq!(outcome.score, 80.0);
        assert!(outcome.issues[0].message.contains("Found 5"));
    }

    #[test]
    fn test_fonts_images_special_chars_penalized() {
        let outcome = check_fonts_images("★ ★ ★ ◆ ◆ ©");
        assert_eq!(outcome.score, 90.0);
        assert!(outcome.issues[0].message.contains("6 special characters"));
    }

    // ── length ──

    #[test]
    fn test_length_in_range() {
        assert_eq!(check_length(&"w ".repeat(400), 400, 800).score, 100.0);
        assert_eq!(check_length(&"w ".repeat(800), 400, 800).score, 100.0);
    }

    #[test]
    fn test_length_short_is_major() {
        let outcome = check_length(&"w ".repeat(399), 400, 800);
        assert_eq!(outcome.score, 60.0);
        assert_eq!(outcome.issues[0].severity, Severity::Major);
        assert!(outcome.issues[0].recommendation.contains("400-800"));
    }

    #[test]
    fn test_length_long_is_minor() {
        let outcome = check_length(&"w ".repeat(801), 400, 800);
        assert_eq!(outcome.score, 80.0);
        assert_eq!(outcome.issues[0].severity, Severity::Minor);
    }
}
