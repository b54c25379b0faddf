//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication failure taxonomy.
///
/// Every failure path of the authentication filter resolves to one of these
/// variants; callers branch on the variant, never on a panic or a library
/// error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header present.
    #[error("Missing Authorization header")]
    MissingHeader,
    /// Authorization header is not of the form `Bearer <token>`.
    #[error("Invalid Authorization header (expected 'Bearer <token>')")]
    MalformedHeader,
    /// Token is structurally invalid or its signature does not verify.
    #[error("Invalid token signature")]
    SignatureInvalid,
    /// Token has expired.
    #[error("Token has expired")]
    Expired,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Stable machine-readable tag for this failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_auth_header",
            AuthError::MalformedHeader => "malformed_auth_header",
            AuthError::SignatureInvalid => "signature_invalid",
            AuthError::Expired => "token_expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_header_returns_401() {
        let response = AuthError::MissingHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn expired_names_the_failure_kind() {
        let response = AuthError::Expired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "token_expired");
        assert!(body["error"].as_str().unwrap().contains("expired"));
    }
}
