//! Tool Registry: the catalog of sandboxable operations the executor may run.
//!
//! Each entry carries a name, a description, a parameter schema and a handler.
//! The registry is built once at startup and is read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::tools::pdf::PdfExtractor;
use crate::tools::{calc, echo, files, pdf};

/// Named arguments for a tool call.
pub type ToolArgs = Map<String, Value>;

// ────────────────────────────────────────────────────────────────────────────
// Result shape
// ────────────────────────────────────────────────────────────────────────────

/// Uniform outcome of every tool invocation. `error` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: String,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: error.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parameter schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

impl ParamType {
    /// `Number` accepts integer and float JSON numbers only; a JSON boolean is a
    /// `Boolean`, never a `Number`.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParameterSpec {
    pub fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    params: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new(params: Vec<ParameterSpec>) -> Self {
        Self { params }
    }

    /// Valid iff every required field is present and every declared field that is
    /// present has the declared type. Unknown fields are ignored.
    pub fn validate(&self, args: &ToolArgs) -> bool {
        self.params.iter().all(|spec| match args.get(spec.name) {
            Some(value) => spec.kind.matches(value),
            None => !spec.required,
        })
    }

    /// Renders as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|spec| {
                let mut prop = json!({
                    "type": spec.kind,
                    "description": spec.description,
                });
                if let Some(default) = &spec.default {
                    prop["default"] = default.clone();
                }
                (spec.name.to_string(), prop)
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|s| s.required)
            .map(|s| s.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers and definitions
// ────────────────────────────────────────────────────────────────────────────

/// A tool implementation. An `Err` (or a panic) is reported by the executor as a failure.
pub trait ToolHandler: Send + Sync {
    fn call(&self, args: &ToolArgs) -> anyhow::Result<ToolResult>;
}

impl<F> ToolHandler for F
where
    F: Fn(&ToolArgs) -> anyhow::Result<ToolResult> + Send + Sync,
{
    fn call(&self, args: &ToolArgs) -> anyhow::Result<ToolResult> {
        self(args)
    }
}

#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(&ToolArgs) -> anyhow::Result<ToolResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Public description of a tool (no handler).
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Fetches a string argument, if present and a string.
pub fn str_arg<'a>(args: &'a ToolArgs, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in tools: echo, calc, read_file, list_files, pdf_to_text.
    /// File tools resolve paths relative to `sandbox_root` and never leave it.
    pub fn builtin(sandbox_root: PathBuf, pdf_extractor: Arc<dyn PdfExtractor>) -> Self {
        let mut registry = Self::new();
        registry.register(echo::definition());
        registry.register(calc::definition());
        registry.register(files::read_file_definition(sandbox_root.clone()));
        registry.register(files::list_files_definition(sandbox_root.clone()));
        registry.register(pdf::definition(sandbox_root, pdf_extractor));
        registry
    }

    /// Adds a tool, replacing any existing tool of the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        self.tools.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// name → description for every tool.
    pub fn list(&self) -> BTreeMap<String, String> {
        self.tools
            .values()
            .map(|t| (t.name.clone(), t.description.clone()))
            .collect()
    }

    pub fn describe(&self, name: &str) -> Option<ToolInfo> {
        self.get(name).map(|t| ToolInfo {
            name: t.name.clone(),
            description: t.description.clone(),
            parameters: t.parameters.to_json_schema(),
        })
    }

    /// Unknown tools are never valid.
    pub fn validate(&self, name: &str, args: &ToolArgs) -> bool {
        self.get(name)
            .map(|t| t.parameters.validate(args))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::pdf::{ExtractionMethod, PdfExtraction};
    use std::path::Path;

    struct NoPdf;

    impl PdfExtractor for NoPdf {
        fn extract(&self, _path: &Path) -> PdfExtraction {
            PdfExtraction::failed(ExtractionMethod::Error, "disabled")
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::builtin(PathBuf::from("."), Arc::new(NoPdf))
    }

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_builtin_tools_present() {
        let registry = registry();
        for name in ["echo", "calc", "read_file", "list_files", "pdf_to_text"] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert_eq!(registry.list().len(), 5);
    }

    #[test]
    fn test_get_unknown_tool_is_none() {
        assert!(registry().get("non_existent").is_none());
    }

    #[test]
    fn test_list_returns_descriptions_only() {
        let listed = registry().list();
        assert_eq!(listed.len(), 5);
        assert!(listed["echo"].contains("Echo"));
    }

    #[test]
    fn test_validate_accepts_well_typed_args() {
        let registry = registry();
        assert!(registry.validate("echo", &args(json!({"text": "x"}))));
        assert!(registry.validate("calc", &args(json!({"expression": "2 + 2"}))));
        assert!(registry.validate("read_file", &args(json!({"filepath": "a.txt"}))));
        assert!(registry.validate("list_files", &args(json!({}))));
        assert!(registry.validate("list_files", &args(json!({"directory": "."}))));
    }

    #[test]
    fn test_validate_rejects_missing_or_mistyped() {
        let registry = registry();
        assert!(!registry.validate("echo", &args(json!({}))));
        assert!(!registry.validate("echo", &args(json!({"text": 123}))));
        assert!(!registry.validate("calc", &args(json!({"expression": 5}))));
        assert!(!registry.validate("read_file", &args(json!({}))));
        assert!(!registry.validate("list_files", &args(json!({"directory": false}))));
    }

    #[test]
    fn test_validate_unknown_tool_is_invalid() {
        assert!(!registry().validate("unknown", &args(json!({}))));
    }

    #[test]
    fn test_validate_ignores_unknown_fields() {
        assert!(registry().validate("echo", &args(json!({"text": "x", "extra": 1}))));
    }

    #[test]
    fn test_param_type_checks() {
        assert!(ParamType::Number.matches(&json!(1.5)));
        assert!(ParamType::Number.matches(&json!(3)));
        assert!(!ParamType::Number.matches(&json!("3")));
        assert!(!ParamType::Number.matches(&json!(true)));
        assert!(ParamType::Boolean.matches(&json!(true)));
        assert!(!ParamType::Boolean.matches(&json!(1)));
    }

    #[test]
    fn test_describe_renders_json_schema() {
        let info = registry().describe("list_files").unwrap();
        assert_eq!(info.name, "list_files");
        assert_eq!(info.parameters["type"], "object");
        assert_eq!(info.parameters["properties"]["directory"]["type"], "string");
        assert_eq!(info.parameters["properties"]["directory"]["default"], ".");
        assert_eq!(info.parameters["required"], json!([]));

        let info = registry().describe("echo").unwrap();
        assert_eq!(info.parameters["required"], json!(["text"]));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = registry();
        registry.register(ToolDefinition::new(
            "echo",
            "shadowed",
            ParameterSchema::default(),
            |_| Ok(ToolResult::ok("shadow")),
        ));
        assert_eq!(registry.list().len(), 5);
        assert_eq!(registry.get("echo").unwrap().description, "shadowed");
    }

    #[test]
    fn test_tool_result_constructors() {
        let ok = ToolResult::ok("done");
        assert!(ok.success);
        assert!(ok.error.is_empty());

        let failed = ToolResult::failure("boom");
        assert!(!failed.success);
        assert!(failed.output.is_empty());
        assert_eq!(failed.error, "boom");
    }
}
