//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → circuit_breaker.rs try_acquire (reject fast while Open)
//!     → backend call runs under its bounded timeout
//!     → permit.record(Success | Failure)
//!     → window + state updated atomically per breaker identifier
//! ```
//!
//! # Design Decisions
//! - No per-request retries: resilience against transient backend failure
//!   comes solely from the breaker's fail-fast behavior on later requests
//! - Timeouts are enforced where the call is placed; the breaker only
//!   consumes the resulting outcome
//! - Breaker state is in-memory only and does not survive restarts

pub mod circuit_breaker;

pub use circuit_breaker::{
    BreakerPolicy, BreakerRegistry, BreakerRejected, CallPermit, CircuitBreaker, CircuitState,
    Outcome,
};
