//! Parsed resume: the structured half of a resume handed over by the extraction pipeline.
//!
//! Incoming JSON is an untyped mapping. Known keys are classified into typed sections
//! so checks match on shape; everything else lands in `Other`, keeping only its key.
//! Key classification is case-insensitive.

use serde_json::{Map, Value};

/// Which contact detail a resume key carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContactKind {
    Email,
    Phone,
    Address,
    Location,
    Contact,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Email => "email",
            ContactKind::Phone => "phone",
            ContactKind::Address => "address",
            ContactKind::Location => "location",
            ContactKind::Contact => "contact",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "email" => Some(ContactKind::Email),
            "phone" => Some(ContactKind::Phone),
            "address" => Some(ContactKind::Address),
            "location" => Some(ContactKind::Location),
            "contact" => Some(ContactKind::Contact),
            _ => None,
        }
    }
}

/// A `skills` value, which parsers emit either as a list or as free text.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillsField {
    List(Vec<String>),
    Text(String),
    /// Present but neither a list nor a string.
    Unrecognized,
}

impl SkillsField {
    /// Lowercased skill tokens. Non-string list items are skipped; text is split on whitespace.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            SkillsField::List(items) => items.iter().map(|s| s.to_lowercase()).collect(),
            SkillsField::Text(text) => text
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect(),
            SkillsField::Unrecognized => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeSection {
    Contact(ContactKind),
    /// One of `experience|work_experience|employment|jobs` holding a list.
    Experience(Vec<Value>),
    Skills(SkillsField),
    Education,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeEntry {
    /// Key exactly as it appeared in the source mapping.
    pub key: String,
    pub section: ResumeSection,
}

/// Structured resume data. An absent or non-object input is an empty resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResume {
    entries: Vec<ResumeEntry>,
}

const EXPERIENCE_KEYS: &[&str] = &["experience", "work_experience", "employment", "jobs"];

impl ParsedResume {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let entries = map
            .iter()
            .map(|(key, value)| ResumeEntry {
                key: key.clone(),
                section: classify(key, value),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ResumeEntry] {
        &self.entries
    }

    /// Lowercased keys, in source order.
    pub fn keys_lowercase(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|e| e.key.to_lowercase())
    }

    pub fn contact_kinds(&self) -> impl Iterator<Item = ContactKind> + '_ {
        self.entries.iter().filter_map(|e| match &e.section {
            ResumeSection::Contact(kind) => Some(*kind),
            _ => None,
        })
    }

    pub fn skills(&self) -> Option<&SkillsField> {
        self.entries.iter().find_map(|e| match &e.section {
            ResumeSection::Skills(field) => Some(field),
            _ => None,
        })
    }

    /// True when any experience-like key holds a non-empty list.
    pub fn has_experience_entries(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(&e.section, ResumeSection::Experience(items) if !items.is_empty()))
    }
}

fn classify(key: &str, value: &Value) -> ResumeSection {
    let key_lower = key.to_lowercase();

    if let Some(kind) = ContactKind::from_key(&key_lower) {
        return ResumeSection::Contact(kind);
    }

    if EXPERIENCE_KEYS.contains(&key_lower.as_str()) {
        if let Value::Array(items) = value {
            return ResumeSection::Experience(items.clone());
        }
        return ResumeSection::Other;
    }

    match key_lower.as_str() {
        "skills" => ResumeSection::Skills(match value {
            Value::Array(items) => SkillsField::List(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect(),
            ),
            Value::String(text) => SkillsField::Text(text.clone()),
            _ => SkillsField::Unrecognized,
        }),
        "education" => ResumeSection::Education,
        _ => ResumeSection::Other,
    }
}
