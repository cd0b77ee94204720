//! File tools: `read_file` and `list_files`.
//!
//! Both resolve caller paths against a sandbox root and refuse anything that could
//! leave it: `..` components and absolute paths are rejected outright, and existing
//! paths are canonicalized (following symlinks) and must stay under the root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::tools::registry::{
    str_arg, ParamType, ParameterSchema, ParameterSpec, ToolArgs, ToolDefinition, ToolResult,
};

pub const MAX_READ_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Directory => "Directory",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SandboxError {
    #[error("Path traversal not allowed. Use relative paths only.")]
    Traversal,

    #[error("{} must be in current directory or subdirectories", .0.label())]
    Escapes(EntryKind),

    #[error("{} not found", .0.label())]
    NotFound(EntryKind),

    #[error("Path is not a {}", .0.noun())]
    WrongKind(EntryKind),

    #[error("File too large (max 1MB)")]
    TooLarge,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("File read error: {0}")]
    Read(String),

    #[error("Directory listing error: {0}")]
    List(String),
}

/// A directory that file tools may not leave.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `requested` under the root. A path that does not exist yet is
    /// returned unresolved; the caller reports it as missing.
    pub fn resolve(&self, requested: &str, kind: EntryKind) -> Result<PathBuf, SandboxError> {
        if requested.contains("..") || Path::new(requested).is_absolute() {
            warn!(path = requested, "Rejected path traversal attempt");
            return Err(SandboxError::Traversal);
        }

        let joined = self.root.join(requested);
        if !joined.exists() {
            return Ok(joined);
        }

        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        let resolved = joined.canonicalize().map_err(|e| io_error(e, kind))?;
        if !resolved.starts_with(&root) {
            warn!(path = requested, resolved = %resolved.display(), "Rejected path outside sandbox");
            return Err(SandboxError::Escapes(kind));
        }
        Ok(resolved)
    }

    pub fn read_file(&self, filepath: &str) -> Result<String, SandboxError> {
        let path = self.resolve(filepath, EntryKind::File)?;
        if !path.exists() {
            return Err(SandboxError::NotFound(EntryKind::File));
        }
        if !path.is_file() {
            return Err(SandboxError::WrongKind(EntryKind::File));
        }

        let metadata = fs::metadata(&path).map_err(|e| io_error(e, EntryKind::File))?;
        if metadata.len() > MAX_READ_BYTES {
            return Err(SandboxError::TooLarge);
        }

        let bytes = fs::read(&path).map_err(|e| io_error(e, EntryKind::File))?;
        Ok(decode_text(&bytes))
    }

    pub fn list_files(&self, directory: &str) -> Result<String, SandboxError> {
        let path = self.resolve(directory, EntryKind::Directory)?;
        if !path.exists() {
            return Err(SandboxError::NotFound(EntryKind::Directory));
        }
        if !path.is_dir() {
            return Err(SandboxError::WrongKind(EntryKind::Directory));
        }

        let mut items = Vec::new();
        for entry in fs::read_dir(&path).map_err(|e| io_error(e, EntryKind::Directory))? {
            let entry = entry.map_err(|e| io_error(e, EntryKind::Directory))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_path = entry.path();
            if entry_path.is_file() {
                items.push(format!("FILE: {name}"));
            } else if entry_path.is_dir() {
                items.push(format!("DIR:  {name}"));
            }
        }

        if items.is_empty() {
            return Ok("Directory is empty".to_string());
        }
        items.sort();
        Ok(items.join("\n"))
    }
}

fn io_error(err: io::Error, kind: EntryKind) -> SandboxError {
    match (err.kind(), kind) {
        (io::ErrorKind::PermissionDenied, _) => SandboxError::PermissionDenied,
        (_, EntryKind::File) => SandboxError::Read(err.to_string()),
        (_, EntryKind::Directory) => SandboxError::List(err.to_string()),
    }
}

/// UTF-16 when a byte-order mark says so, otherwise UTF-8 with invalid bytes dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let utf16 = match bytes {
        [0xFF, 0xFE, rest @ ..] => Some((rest, u16::from_le_bytes as fn([u8; 2]) -> u16)),
        [0xFE, 0xFF, rest @ ..] => Some((rest, u16::from_be_bytes as fn([u8; 2]) -> u16)),
        _ => None,
    };

    match utf16 {
        Some((body, to_unit)) => {
            let units = body.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
            char::decode_utf16(units).filter_map(Result::ok).collect()
        }
        None => bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tool definitions
// ────────────────────────────────────────────────────────────────────────────

pub fn read_file_definition(root: PathBuf) -> ToolDefinition {
    let sandbox = Sandbox::new(root);
    ToolDefinition::new(
        "read_file",
        "Read file tool - safely reads text files",
        ParameterSchema::new(vec![ParameterSpec::required(
            "filepath",
            ParamType::String,
            "Path to the file to read (relative path only)",
        )]),
        move |args| {
            Ok(match str_arg(args, "filepath") {
                Some(filepath) => into_result(sandbox.read_file(filepath)),
                None => ToolResult::failure("Filepath must be a string"),
            })
        },
    )
}

pub fn list_files_definition(root: PathBuf) -> ToolDefinition {
    let sandbox = Sandbox::new(root);
    ToolDefinition::new(
        "list_files",
        "List files tool - safely lists files in a directory",
        ParameterSchema::new(vec![ParameterSpec::optional(
            "directory",
            ParamType::String,
            "Directory to list (defaults to current directory)",
        )
        .with_default(json!("."))]),
        move |args: &ToolArgs| {
            Ok(match args.get("directory") {
                None => into_result(sandbox.list_files(".")),
                Some(_) => match str_arg(args, "directory") {
                    Some(directory) => into_result(sandbox.list_files(directory)),
                    None => ToolResult::failure("Directory must be a string"),
                },
            })
        },
    )
}

fn into_result(outcome: Result<String, SandboxError>) -> ToolResult {
    match outcome {
        Ok(output) => ToolResult::ok(output),
        Err(e) => ToolResult::failure(e.to_string()),
    }
}
