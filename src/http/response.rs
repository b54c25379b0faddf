//! Canned gateway responses.
//!
//! # Responsibilities
//! - Produce the fixed service-unavailable fallback for a route's service
//! - Produce the no-route 404 body
//!
//! # Design Decisions
//! - The fallback is identical whether the breaker rejected the call or the
//!   backend failed live; callers never distinguish the two here
//! - Stable field order via serialized structs, so the body is byte-stable
//!   for a given service name

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body of the service-unavailable fallback.
#[derive(Debug, Serialize)]
pub struct FallbackBody {
    pub status: &'static str,
    pub message: String,
    #[serde(rename = "httpStatus")]
    pub http_status: u16,
}

/// Fallback Responder: fixed 503 payload for an unavailable service.
pub fn fallback_response(service_name: &str) -> Response {
    let body = FallbackBody {
        status: "SERVICE_UNAVAILABLE",
        message: format!("{service_name} is currently unavailable. Try after some time."),
        http_status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    error_code: &'static str,
}

/// 404 for a request no route pattern matches.
pub fn no_route_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "No matching route found",
            error_code: "no_route_match",
        }),
    )
        .into_response()
}
