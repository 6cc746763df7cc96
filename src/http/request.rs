//! Request handling.
//!
//! # Responsibilities
//! - Attach a unique request ID (UUID v4) when the client sent none
//! - Extract the match descriptor (method, path, query)
//! - Log the full request when request logging is enabled
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Payload is only buffered when it is going to be logged

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::routing::MatchRequest;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Largest payload buffered for request logging.
pub const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

/// Layer that sets `x-request-id` on requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the match descriptor for a request.
pub fn match_request<B>(request: &Request<B>) -> MatchRequest {
    MatchRequest::new(
        request.method().as_str(),
        request.uri().path(),
        request.uri().query().unwrap_or_default(),
    )
}

/// Log method, URL, headers and payload, then hand the request back intact.
pub async fn log_request(request: Request<Body>) -> Request<Body> {
    let (parts, body) = request.into_parts();

    let payload = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id(&parts.headers),
                error = %e,
                "Request body not logged"
            );
            Default::default()
        }
    };

    let headers: Vec<String> = parts
        .headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
        .collect();

    tracing::info!(
        request_id = %request_id(&parts.headers),
        method = %parts.method,
        uri = %parts.uri,
        headers = %headers.join("\n"),
        payload = %String::from_utf8_lossy(&payload),
        "Processing request"
    );

    Request::from_parts(parts, Body::from(payload))
}
