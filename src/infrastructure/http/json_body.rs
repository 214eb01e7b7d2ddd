use axum::{
    async_trait,
    body::Body,
    extract::FromRequest,
    http::{header, Request, StatusCode},
};
use serde_json::{Map, Value};

use crate::error::{AppError, ClientError};

/// Body limit for task requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

/// Extractor for JSON request bodies.
///
/// A zero-length body is read as an empty object whatever its content type,
/// so an empty create reports missing fields and an empty partial update is a
/// no-op. A non-empty body must be `application/json` and parse.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES)
            .await
            .map_err(|err| {
                if std::error::Error::source(&err)
                    .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
                {
                    ClientError::new(
                        format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                        StatusCode::PAYLOAD_TOO_LARGE,
                    )
                } else {
                    ClientError::new(
                        format!("Failed to read request body: {err}"),
                        StatusCode::BAD_REQUEST,
                    )
                }
            })?;

        if bytes.is_empty() {
            return Ok(Self(Value::Object(Map::new())));
        }

        let media_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !is_json(media_type) {
            return Err(ClientError::unsupported_media_type(media_type).into());
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| ClientError::json_parse_error(&err).into())
    }
}

/// `application/json`, parameters such as `charset` allowed
fn is_json(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
