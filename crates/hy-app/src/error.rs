//! Error types for the hy-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Case compilation failed: {0}")]
    Compile(String),

    #[error("Solver error in case '{case}', operation '{operation}': {message}")]
    Solver {
        case: String,
        operation: String,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write report file: {path}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hy-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<hy_project::ProjectError> for AppError {
    fn from(err: hy_project::ProjectError) -> Self {
        match err {
            hy_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<hy_project::ValidationError> for AppError {
    fn from(err: hy_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hy_components::ComponentError> for AppError {
    fn from(err: hy_components::ComponentError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Project(format!("YAML serialization failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Project(format!("JSON serialization failed: {}", err))
    }
}
