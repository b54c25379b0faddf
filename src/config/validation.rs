//! Configuration validation.
//!
//! Serde handles syntactic checks; this module covers the semantic ones:
//! value ranges, non-empty identifiers, backend URIs that can actually be
//! dialed. Every violation is collected so one pass over the file reports
//! them all.

use axum::http::Uri;

use crate::config::schema::GatewayConfig;

/// A single semantic violation, with enough context to locate it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("auth.secret must not be empty")]
    EmptySecret,

    #[error("auth.identity_header must not be empty")]
    EmptyIdentityHeader,

    #[error("at least one route must be configured")]
    NoRoutes,

    #[error("route {index}: path {path:?} must start with '/'")]
    BadRoutePath { index: usize, path: String },

    #[error("route {index}: backend {backend:?} is not a valid http(s) base URI")]
    BadBackendUri { index: usize, backend: String },

    #[error("route {index}: breaker identifier must not be empty")]
    EmptyBreakerId { index: usize },

    #[error("route {index}: service_name must not be empty")]
    EmptyServiceName { index: usize },

    #[error("breaker.failure_rate_threshold {value} must be in (0, 1]")]
    BadFailureThreshold { value: f64 },

    #[error("breaker.window_size must be at least 1")]
    ZeroWindow,

    #[error("breaker.min_calls must be at least 1")]
    ZeroMinCalls,

    #[error("breaker.min_calls {min_calls} must not exceed window_size {window_size}")]
    MinCallsExceedsWindow { min_calls: usize, window_size: usize },

    #[error("timeouts.{field} must be at least 1 second")]
    ZeroTimeout { field: &'static str },
}

/// Validate a parsed configuration, returning every violation found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.secret.trim().is_empty() {
        errors.push(ValidationError::EmptySecret);
    }
    if config.auth.identity_header.trim().is_empty() {
        errors.push(ValidationError::EmptyIdentityHeader);
    }

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }
    for (index, route) in config.routes.iter().enumerate() {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::BadRoutePath {
                index,
                path: route.path.clone(),
            });
        }
        if !is_backend_uri(&route.backend) {
            errors.push(ValidationError::BadBackendUri {
                index,
                backend: route.backend.clone(),
            });
        }
        if route.breaker.trim().is_empty() {
            errors.push(ValidationError::EmptyBreakerId { index });
        }
        if route.service_name.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceName { index });
        }
    }

    let breaker = &config.breaker;
    if !(breaker.failure_rate_threshold > 0.0 && breaker.failure_rate_threshold <= 1.0) {
        errors.push(ValidationError::BadFailureThreshold {
            value: breaker.failure_rate_threshold,
        });
    }
    if breaker.window_size == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if breaker.min_calls == 0 {
        errors.push(ValidationError::ZeroMinCalls);
    }
    if breaker.min_calls > breaker.window_size && breaker.window_size > 0 {
        errors.push(ValidationError::MinCallsExceedsWindow {
            min_calls: breaker.min_calls,
            window_size: breaker.window_size,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "request_secs",
        });
    }
    if config.timeouts.backend_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "backend_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A backend base URI must parse and carry an http(s) scheme plus authority.
fn is_backend_uri(raw: &str) -> bool {
    match raw.parse::<Uri>() {
        Ok(uri) => {
            matches!(uri.scheme_str(), Some("http") | Some("https")) && uri.authority().is_some()
        }
        Err(_) => false,
    }
}
