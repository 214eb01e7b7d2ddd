use axum::http::StatusCode;

use crate::domain::shared::error_dto::ErrorDetail;
use crate::error::{ApiError, AppError, ClientError};

pub const TASK_NOT_FOUND: &str = "task_not_found";

#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0:?}")]
    Invalid(ErrorDetail),
    /// Holds the id exactly as it was requested
    #[error("task {0} not found")]
    NotFound(String),
    #[error("invalid page")]
    InvalidPage,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskServiceError {
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound(id.to_string())
    }
}

/// `task_not_found` API error for the given lookup key.
pub fn task_not_found(id: &str) -> ApiError {
    ApiError::new(TASK_NOT_FOUND, format!("Task with id={} not found.", id))
        .with_status(StatusCode::NOT_FOUND)
}

impl From<AppError> for TaskServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(detail) => TaskServiceError::Invalid(detail),
            AppError::Internal(e) => TaskServiceError::Other(e),
            _ => TaskServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<TaskServiceError> for AppError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Invalid(detail) => AppError::Validation(detail),
            TaskServiceError::NotFound(id) => AppError::Api(task_not_found(&id)),
            TaskServiceError::InvalidPage => AppError::Client(ClientError::invalid_page()),
            TaskServiceError::Dependency(msg) => AppError::Internal(anyhow::anyhow!(msg)),
            TaskServiceError::Other(e) => AppError::Internal(e),
        }
    }
}
