//! Authentication filter.
//!
//! # Responsibilities
//! - Exempt configured public path prefixes from authentication
//! - Extract and verify the bearer token on every other request
//! - Rewrite the forwarded request: strip `Authorization`, inject the
//!   verified subject under the configured identity header
//!
//! # Design Decisions
//! - Runs as an axum middleware ahead of routing; failures short-circuit
//!   with 401 and the request is never forwarded
//! - The middleware owns the request value, so the header rewrite is only
//!   visible downstream; nothing else aliases the inbound request
//! - Outcomes are emitted as structured tracing events, not inline logging
//!   of token contents

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{HeaderName, HeaderValue, InvalidHeaderName, AUTHORIZATION},
        Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::error::AuthError;
use crate::auth::token::TokenVerifier;
use crate::config::AuthConfig;
use crate::http::server::AppState;

/// Identity of the verified caller, attached to request extensions for the
/// remainder of the pipeline and dropped with the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub expires_at: i64,
}

/// The per-request authentication gate: verifier plus the configuration it
/// needs, built once at startup.
pub struct AuthGate {
    verifier: TokenVerifier,
    public_prefixes: Vec<String>,
    identity_header: HeaderName,
}

impl AuthGate {
    pub fn new(config: &AuthConfig) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            verifier: TokenVerifier::new(&config.secret),
            public_prefixes: config.public_prefixes.clone(),
            identity_header: config.identity_header.to_lowercase().parse()?,
        })
    }

    /// Whether a path is exempt from authentication.
    ///
    /// Segment-aware prefix match on the normalized path (one trailing slash
    /// ignored): "/auth" covers "/auth" and "/auth/login" but not "/authx".
    pub fn is_public(&self, path: &str) -> bool {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        self.public_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn identity_header(&self) -> &HeaderName {
        &self.identity_header
    }
}

/// Pipeline stage gating every request before routing.
pub async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let gate = &state.auth;
    let path = request.uri().path().to_string();

    if gate.is_public(&path) {
        tracing::debug!(path = %path, "public path, skipping authentication");
        return next.run(request).await;
    }

    let header_value = match request.headers().get(AUTHORIZATION) {
        Some(value) => value,
        None => return reject(&path, AuthError::MissingHeader),
    };

    let token = match header_value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix("Bearer "))
    {
        Some(token) if !token.is_empty() => token,
        _ => return reject(&path, AuthError::MalformedHeader),
    };

    let verified = match gate.verifier.verify(token) {
        Ok(verified) => verified,
        Err(error) => return reject(&path, error),
    };

    let subject_value = match HeaderValue::from_str(&verified.subject) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!(path = %path, "verified subject is not a valid header value");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(path = %path, subject = %verified.subject, "request authenticated");

    // Rewrite the forwarded copy: credential out, verified identity in.
    let headers = request.headers_mut();
    headers.remove(AUTHORIZATION);
    headers.insert(gate.identity_header.clone(), subject_value);

    request.extensions_mut().insert(AuthContext {
        subject: verified.subject,
        expires_at: verified.expires_at,
    });

    next.run(request).await
}

fn reject(path: &str, error: AuthError) -> Response {
    tracing::warn!(path = %path, error_code = error.error_code(), "authentication failed");
    error.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AuthGate {
        AuthGate::new(&AuthConfig::default()).unwrap()
    }

    #[test]
    fn public_prefixes_match() {
        let gate = gate();
        assert!(gate.is_public("/auth/login"));
        assert!(gate.is_public("/auth"));
        assert!(gate.is_public("/swagger-ui/index.html"));
        assert!(gate.is_public("/health"));
        assert!(gate.is_public("/health/"));
    }

    #[test]
    fn protected_paths_do_not_match() {
        let gate = gate();
        assert!(!gate.is_public("/v1/banks/b1/users"));
        assert!(!gate.is_public("/"));
        assert!(!gate.is_public("/authx-not-quite"));
    }

    #[test]
    fn identity_header_is_parsed_once() {
        let gate = gate();
        assert_eq!(gate.identity_header().as_str(), "x-authenticated-user");
    }
}
