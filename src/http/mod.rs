//! HTTP subsystem: server assembly, request identification, canned responses.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → TraceLayer (span per request)
//!     → request.rs (ensure x-request-id)
//!     → TimeoutLayer (total request budget)
//!     → auth filter (401 short-circuit or rewritten request)
//!     → server.rs proxy_handler
//!         → routing (404 on no match)
//!         → circuit breaker (fallback on rejection)
//!         → backend call (bounded timeout)
//!     → response.rs fallback on breaker-open/backend-failure
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, GatewayServer, ServerInitError};
