use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Per-request facts handed to the exception dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    pub path: String,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path: path.into(),
        }
    }

    pub fn from_request(request: &Request) -> Self {
        Self::new(request.method().clone(), request.uri().path())
    }
}

/// Attach a fresh [`RequestContext`] to the request and echo its id back
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let context = RequestContext::from_request(&request);
    let request_id = context.request_id.clone();

    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, header_value);
    }

    response
}
