//! Responses the dev server originates itself.
//!
//! The proxy relays backend responses verbatim; the only responses built
//! here are the gateway errors for an unreachable backend.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::request::X_REQUEST_ID;

/// 502 returned when the backend cannot be reached.
///
/// Upstream failures are a transport concern and never affect rule
/// matching; the client gets a gateway error with the request ID echoed
/// for correlation.
pub fn bad_gateway(request_id: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        [(X_REQUEST_ID, request_id)],
        "upstream unavailable",
    )
        .into_response()
}
