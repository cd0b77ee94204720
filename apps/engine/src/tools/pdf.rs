//! PDF text extraction.
//!
//! The extraction backend sits behind [`PdfExtractor`]; the default uses the
//! `pdf-extract` text layer. The `pdf_to_text` tool applies the file sandbox rules
//! before handing a path to the backend and folds the backend's report into a
//! [`ToolResult`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tools::files::{EntryKind, Sandbox};
use crate::tools::registry::{
    str_arg, ParamType, ParameterSchema, ParameterSpec, ToolDefinition, ToolResult,
};

/// Extracted text shorter than this (after trimming) is treated as nothing.
const MIN_MEANINGFUL_CHARS: usize = 10;
const HIGH_CONFIDENCE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Whole-document text layer.
    #[serde(rename = "pdfminer")]
    TextLayer,
    /// Page-by-page text.
    #[serde(rename = "pypdf")]
    PageText,
    Ocr,
    Error,
    Fallback,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::TextLayer => "pdfminer",
            ExtractionMethod::PageText => "pypdf",
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Error => "error",
            ExtractionMethod::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionConfidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for ExtractionConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionConfidence::High => "high",
            ExtractionConfidence::Medium => "medium",
            ExtractionConfidence::Low => "low",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfExtraction {
    pub text: String,
    pub method: ExtractionMethod,
    pub confidence: ExtractionConfidence,
    pub pages_processed: u32,
    pub error: Option<String>,
}

impl PdfExtraction {
    pub fn failed(method: ExtractionMethod, error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            method,
            confidence: ExtractionConfidence::Low,
            pages_processed: 0,
            error: Some(error.into()),
        }
    }

    /// Empty text is a failure carrying the backend's reason.
    pub fn into_tool_result(self) -> ToolResult {
        if self.text.is_empty() {
            return ToolResult::failure(
                self.error
                    .unwrap_or_else(|| "No text extracted from PDF".to_string()),
            );
        }
        ToolResult::ok(format!(
            "Method: {}\nConfidence: {}\nText:\n{}",
            self.method, self.confidence, self.text
        ))
    }
}

/// Pluggable PDF text backend.
pub trait PdfExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> PdfExtraction;
}

/// Default backend: the document's embedded text layer via `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayerExtractor;

impl PdfExtractor for TextLayerExtractor {
    fn extract(&self, path: &Path) -> PdfExtraction {
        if !path.exists() {
            return PdfExtraction::failed(ExtractionMethod::Error, "File not found");
        }
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return PdfExtraction::failed(ExtractionMethod::Error, "File must be a PDF");
        }

        match pdf_extract::extract_text(path) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.chars().count() <= MIN_MEANINGFUL_CHARS {
                    return PdfExtraction::failed(
                        ExtractionMethod::TextLayer,
                        "No meaningful text extracted",
                    );
                }
                let confidence = if text.chars().count() > HIGH_CONFIDENCE_CHARS {
                    ExtractionConfidence::High
                } else {
                    ExtractionConfidence::Medium
                };
                debug!(path = %path.display(), chars = trimmed.len(), "Extracted PDF text layer");
                PdfExtraction {
                    text: trimmed.to_string(),
                    method: ExtractionMethod::TextLayer,
                    confidence,
                    pages_processed: 1,
                    error: None,
                }
            }
            Err(e) => PdfExtraction::failed(
                ExtractionMethod::TextLayer,
                format!("PDF text extraction failed: {e}"),
            ),
        }
    }
}

pub fn definition(root: PathBuf, extractor: Arc<dyn PdfExtractor>) -> ToolDefinition {
    let sandbox = Sandbox::new(root);
    ToolDefinition::new(
        "pdf_to_text",
        "PDF text extraction tool - extracts text from PDF files using multiple methods",
        ParameterSchema::new(vec![ParameterSpec::required(
            "filepath",
            ParamType::String,
            "Path to the PDF file to extract text from",
        )]),
        move |args| {
            let Some(filepath) = str_arg(args, "filepath") else {
                return Ok(ToolResult::failure("Filepath must be a string"));
            };
            let path = match sandbox.resolve(filepath, EntryKind::File) {
                Ok(path) => path,
                Err(e) => return Ok(ToolResult::failure(e.to_string())),
            };
            Ok(extractor.extract(&path).into_tool_result())
        },
    )
}
