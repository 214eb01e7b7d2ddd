use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::domain::shared::error_dto::{ErrorDetail, ErrorPayload};

/// Main application error type
///
/// Handlers only return the most specific variant they know about; turning it
/// into a body is left to the exception dispatcher at the edge of the router.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    Validation(ErrorDetail),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Typed error raised explicitly by application code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: String,
    message: String,
    status: StatusCode,
    errors: Option<ErrorDetail>,
}

impl ApiError {
    /// New error with status 400 and no field detail.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
            errors: None,
        }
    }

    pub fn with_status(self, status: StatusCode) -> Self {
        Self { status, ..self }
    }

    pub fn with_errors(self, errors: impl Into<ErrorDetail>) -> Self {
        Self {
            errors: Some(errors.into()),
            ..self
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn errors(&self) -> Option<&ErrorDetail> {
        self.errors.as_ref()
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload::build(
            self.code.clone(),
            self.message.clone(),
            self.status,
            self.errors.clone(),
        )
    }
}

/// Client-fault condition detected by the HTTP layer itself (bad JSON,
/// unsupported method, out of range page) rather than by application code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ClientError {
    detail: String,
    status: StatusCode,
}

impl ClientError {
    pub fn new(detail: impl Into<String>, status: StatusCode) -> Self {
        Self {
            detail: detail.into(),
            status,
        }
    }

    pub fn method_not_allowed(method: &Method) -> Self {
        Self::new(
            format!("Method \"{}\" not allowed.", method),
            StatusCode::METHOD_NOT_ALLOWED,
        )
    }

    pub fn invalid_page() -> Self {
        Self::new("Invalid page.", StatusCode::NOT_FOUND)
    }

    /// `media_type` is the raw `Content-Type`, empty when the header is missing
    pub fn unsupported_media_type(media_type: &str) -> Self {
        Self::new(
            format!("Unsupported media type \"{}\" in request.", media_type),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        )
    }

    pub fn json_parse_error(error: &serde_json::Error) -> Self {
        Self::new(format!("JSON parse error - {}", error), StatusCode::BAD_REQUEST)
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Status the HTTP layer would have used on its own.
    pub fn original_status(&self) -> StatusCode {
        self.status
    }
}

impl From<QueryRejection> for ClientError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.body_text(), rejection.status())
    }
}

impl From<PathRejection> for ClientError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.body_text(), rejection.status())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Client(rejection.into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Client(rejection.into())
    }
}

/// An [`AppError`] travelling in the response extensions until the error
/// boundary picks it up.
#[derive(Debug, Clone)]
pub struct RaisedError(pub Arc<AppError>);

/// Handlers never render errors themselves: the response is a bare 500 that
/// carries the error for the dispatcher.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(RaisedError(Arc::new(self)));
        response
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
