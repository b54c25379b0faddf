//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, Authorization header)
//!     → filter.rs (public-prefix exemption, bearer extraction)
//!     → token.rs (signature check, explicit expiration check)
//!     → Success: rewritten request + AuthContext forwarded downstream
//!     → Failure: tagged AuthError → 401, pipeline terminates
//! ```
//!
//! # Design Decisions
//! - Token verification is a pure function of (token, shared key)
//! - Failures are values, not exceptions: callers branch on `AuthError`
//! - The inbound request is consumed by the filter; the rewritten copy is
//!   the only one forwarded

pub mod error;
pub mod filter;
pub mod token;

pub use error::AuthError;
pub use filter::{authentication_middleware, AuthContext, AuthGate};
pub use token::{TokenVerifier, VerifiedToken};
