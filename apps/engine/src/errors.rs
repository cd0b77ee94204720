use serde_json::{json, Value};
use thiserror::Error;

/// Application-level error type for the command surface.
/// Each variant maps to a stable machine code and a process exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable input: {0}")]
    UnprocessableEntity(String),

    /// The tool ran (or was refused) and reported failure; the message is its reason.
    #[error("{0}")]
    ToolFailed(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            AppError::ToolFailed(_) => "TOOL_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ToolFailed(_) => 1,
            AppError::Validation(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::UnprocessableEntity(_) => 4,
            AppError::Internal(_) => 70,
        }
    }

    /// Error body written to stderr.
    pub fn to_json(&self) -> Value {
        if let AppError::Internal(e) = self {
            tracing::error!("Internal error: {e:?}");
        }
        json!({
            "error": {
                "code": self.code(),
                "message": self.to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_exit_codes_are_distinct() {
        let errors = [
            AppError::NotFound("x".into()),
            AppError::Validation("x".into()),
            AppError::UnprocessableEntity("x".into()),
            AppError::ToolFailed("x".into()),
            AppError::Internal(anyhow::anyhow!("x")),
        ];
        let mut exit_codes: Vec<i32> = errors.iter().map(AppError::exit_code).collect();
        exit_codes.sort();
        exit_codes.dedup();
        assert_eq!(exit_codes.len(), errors.len());
        assert!(exit_codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_json_body_shape() {
        let body = AppError::NotFound("Tool 'nope' not found in registry".into()).to_json();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(
            body["error"]["message"],
            "Not found: Tool 'nope' not found in registry"
        );
    }

    #[test]
    fn test_tool_failure_message_is_unwrapped() {
        let err = AppError::ToolFailed("Division by zero".into());
        assert_eq!(err.to_string(), "Division by zero");
    }
}
