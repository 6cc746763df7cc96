//! Response construction.
//!
//! # Responsibilities
//! - Turn a matched route into a response (status, headers, templated body)
//! - Build the configured fall-through response
//!
//! # Design Decisions
//! - Headers keep definition order; invalid names or values are skipped
//! - Framing headers from definitions are dropped, the server computes them
//! - An out-of-range status code becomes 500 rather than a panic

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::FallbackConfig;
use crate::httpfile::{render_body, Route};
use crate::routing::CapturedVariables;

/// Build the canned response for a matched route.
pub fn route_response(route: &Route, variables: &CapturedVariables) -> Response {
    let status = StatusCode::from_u16(route.status_code).unwrap_or_else(|_| {
        tracing::warn!(
            file = %route.file_name,
            status = route.status_code,
            "Invalid status code in definition"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let body = render_body(&route.body, variables).into_owned();
    let mut response = (status, Body::from(body)).into_response();

    let headers = response.headers_mut();
    for (name, value) in route.headers.iter() {
        let parsed = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        );
        match parsed {
            (Ok(name), _) if is_framing_header(&name) => {}
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(
                file = %route.file_name,
                header = %name,
                "Skipping invalid response header"
            ),
        }
    }

    response
}

/// Build the response for requests no route matched.
pub fn fallback_response(config: &FallbackConfig) -> Response {
    let status = StatusCode::from_u16(config.status).unwrap_or(StatusCode::NOT_FOUND);
    let mut response = (status, config.body.clone()).into_response();

    if let Ok(content_type) = HeaderValue::from_str(&config.content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

fn is_framing_header(name: &HeaderName) -> bool {
    name == header::CONTENT_LENGTH || name == header::TRANSFER_ENCODING
}
