use thiserror::Error;

use crate::layout::LayoutError;
use crate::llm_client::LlmError;
use crate::pipeline::PipelineError;

/// Application-level error type.
/// Every subsystem error funnels into this at the binary boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code, used in the final log line on failure.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Layout(LayoutError::Configuration(_)) => "CONFIGURATION_ERROR",
            AppError::Layout(_) => "RENDER_ERROR",
            AppError::Pipeline(_) => "PIPELINE_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_code() {
        let err: AppError = LayoutError::Configuration("cards per row must be > 0".into()).into();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("cards per row"));
    }

    #[test]
    fn test_backend_error_code() {
        let err: AppError = LayoutError::Backend("font".into()).into();
        assert_eq!(err.code(), "RENDER_ERROR");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
