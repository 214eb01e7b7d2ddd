//! Exception dispatcher: turns every error escaping a handler into the
//! uniform error body.
//!
//! Classification runs in a fixed order:
//!
//! 1. validation failures -> `validation_error`, 400, field detail
//! 2. typed [`ApiError`](crate::error::ApiError)s -> taken verbatim
//! 3. client errors detected by the HTTP layer -> `error`, always 400
//! 4. errors the default handler renders as a JSON object ->
//!    `unhandled_error`, with the default handler's status
//! 5. anything else -> passed through untouched, or no response at all

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::context::RequestContext;
use crate::domain::shared::error_dto::ErrorPayload;
use crate::error::AppError;

pub const VALIDATION_ERROR: &str = "validation_error";
pub const VALIDATION_MESSAGE: &str = "Given data is not valid.";
pub const CLIENT_ERROR: &str = "error";
pub const UNHANDLED_ERROR: &str = "unhandled_error";
pub const UNHANDLED_MESSAGE: &str = "Unknown error occurred.";

/// Response produced by the HTTP layer's own error rendering
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for FallbackResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// The HTTP layer's own rendering of errors the dispatcher does not classify
pub type DefaultHandler =
    Arc<dyn Fn(&AppError, &RequestContext) -> Option<FallbackResponse> + Send + Sync>;

/// Renders unknown routes as `404 {"detail": "Not found."}` and leaves
/// everything else unrendered.
pub fn default_error_handler(error: &AppError, _context: &RequestContext) -> Option<FallbackResponse> {
    match error {
        AppError::RouteNotFound(_) => Some(FallbackResponse {
            status: StatusCode::NOT_FOUND,
            body: json!({"detail": "Not found."}),
        }),
        _ => None,
    }
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Normalized(ErrorPayload),
    Passthrough(FallbackResponse),
}

impl Dispatched {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Normalized(payload) => payload.status(),
            Self::Passthrough(fallback) => fallback.status,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Normalized(payload) => Some(payload.code()),
            Self::Passthrough(_) => None,
        }
    }
}

impl IntoResponse for Dispatched {
    fn into_response(self) -> Response {
        match self {
            Self::Normalized(payload) => payload.into_response(),
            Self::Passthrough(fallback) => fallback.into_response(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionDispatcher {
    default_handler: DefaultHandler,
}

impl Default for ExceptionDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(default_error_handler))
    }
}

impl ExceptionDispatcher {
    pub fn new(default_handler: DefaultHandler) -> Self {
        Self { default_handler }
    }

    pub fn dispatch(&self, error: &AppError, context: &RequestContext) -> Option<Dispatched> {
        let payload = match error {
            AppError::Validation(detail) => ErrorPayload::build(
                VALIDATION_ERROR,
                VALIDATION_MESSAGE,
                StatusCode::BAD_REQUEST,
                Some(detail.clone()),
            ),
            AppError::Api(api_error) => api_error.to_payload(),
            // the HTTP layer's own status is dropped on purpose
            AppError::Client(client_error) => ErrorPayload::build(
                CLIENT_ERROR,
                client_error.detail(),
                StatusCode::BAD_REQUEST,
                None,
            ),
            AppError::RouteNotFound(_) | AppError::Database(_) | AppError::Internal(_) => {
                return self.fall_back(error, context);
            }
        };

        Some(Dispatched::Normalized(payload))
    }

    fn fall_back(&self, error: &AppError, context: &RequestContext) -> Option<Dispatched> {
        let fallback = (self.default_handler)(error, context)?;

        if fallback.body.is_object() {
            Some(Dispatched::Normalized(ErrorPayload::build(
                UNHANDLED_ERROR,
                UNHANDLED_MESSAGE,
                fallback.status,
                None,
            )))
        } else {
            Some(Dispatched::Passthrough(fallback))
        }
    }
}
