//! Bearer token verification.
//!
//! # Responsibilities
//! - Verify the HS256 signature and structure of an inbound token
//! - Enforce expiration with an explicit check against the current instant
//! - Surface the subject claim for downstream identity propagation
//!
//! # Design Decisions
//! - Pure function of (token, shared key); no side effects, never panics
//! - The library's built-in exp validation is disabled so the explicit
//!   check below is the single source of truth, with zero leeway: a token
//!   whose expiration is at or before now is rejected
//! - Every failure maps to a tagged `AuthError`; library error details are
//!   not forwarded to callers

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// Claims the gateway requires in every token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the authenticated principal).
    pub sub: String,
    /// Expiration time as a Unix timestamp.
    pub exp: i64,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    /// Expiration as a Unix timestamp, strictly after the verification instant.
    pub expires_at: i64,
}

/// Stateless verifier for HS256-signed bearer tokens.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiration is enforced exactly once, by verify() below.
        validation.validate_exp = false;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token: signature and structure first, then expiration.
    ///
    /// The order is deterministic: a token that is both malformed and
    /// expired reports `SignatureInvalid`.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::SignatureInvalid)?;

        let now = Utc::now().timestamp();
        if data.claims.exp <= now {
            return Err(AuthError::Expired);
        }

        Ok(VerifiedToken {
            subject: data.claims.sub,
            expires_at: data.claims.exp,
        })
    }
}
