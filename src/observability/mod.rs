//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured tracing events are the gateway's observability surface
//! - Request ids flow through every event via the request-id layer
//! - No metrics endpoint; an external collector consumes the event stream

pub mod logging;
