use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Version of the error body schema.
///
/// Version 1 carried `error_code`, `http_status_code` and `metadata`.
/// Version 2 is the four-field `code` / `message` / `httpStatus` / `errors` shape.
pub const ERROR_SCHEMA_VERSION: u16 = 2;

/// Response header advertising [`ERROR_SCHEMA_VERSION`] on every error body.
pub const ERROR_SCHEMA_HEADER: &str = "x-error-schema-version";

/// Field name to human-readable violations.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error detail as handed over by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Violations keyed by the offending field
    Fields(FieldErrors),
    /// Violations without a field, e.g. a validator that rejects the whole body
    List(Vec<String>),
}

impl ErrorDetail {
    /// Single violation on a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fields(BTreeMap::from([(name.into(), vec![message.into()])]))
    }

    /// Wire form: bare lists end up under the `errors` key.
    pub fn into_fields(self) -> FieldErrors {
        match self {
            Self::Fields(fields) => fields,
            Self::List(items) => BTreeMap::from([("errors".to_string(), items)]),
        }
    }
}

impl From<FieldErrors> for ErrorDetail {
    fn from(fields: FieldErrors) -> Self {
        Self::Fields(fields)
    }
}

impl From<Vec<String>> for ErrorDetail {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Error body returned by every failing endpoint.
///
/// Serializes to exactly `code`, `message`, `httpStatus` and `errors`;
/// `errors` is always present and `null` when there is no field detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    code: String,
    message: String,
    http_status: u16,
    errors: Option<FieldErrors>,
}

impl ErrorPayload {
    pub fn build(
        code: impl Into<String>,
        message: impl Into<String>,
        http_status: StatusCode,
        errors: Option<ErrorDetail>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            http_status: http_status.as_u16(),
            errors: errors.map(ErrorDetail::into_fields),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code,
            "message": self.message,
            "httpStatus": self.http_status,
            "errors": self.errors,
        })
    }
}

impl IntoResponse for ErrorPayload {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            ERROR_SCHEMA_HEADER,
            HeaderValue::from(ERROR_SCHEMA_VERSION),
        );
        response
    }
}
