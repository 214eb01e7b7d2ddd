use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::context::X_REQUEST_ID;
use crate::domain::shared::error_dto::ERROR_SCHEMA_HEADER;
use crate::infrastructure::config::Config;

/// Build the CORS layer from configuration
///
/// Without an explicit origin list, development is permissive and production
/// allows no cross-origin callers.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        return if config.is_development() {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
        };
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            HeaderName::from_static(X_REQUEST_ID),
            HeaderName::from_static(ERROR_SCHEMA_HEADER),
        ])
}
