//! JWT-authenticating API gateway with per-route circuit breaking.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                   API GATEWAY                     │
//!                  │                                                   │
//!  Client Request  │  ┌────────┐   ┌─────────┐   ┌──────────────┐     │
//!  ────────────────┼─▶│  auth  │──▶│ routing │──▶│   breaker    │     │
//!                  │  │ filter │   │  table  │   │  admission   │     │
//!                  │  └───┬────┘   └────┬────┘   └──────┬───────┘     │
//!                  │    401│         404│               │             │
//!                  │       ▼            ▼               ▼             │
//!  Client Response │  ┌──────────────────────┐   ┌──────────────┐     │
//!  ◀───────────────┼──│ canned responses /   │◀──│ backend call │◀────┼── Backend
//!                  │  │ 503 fallback         │   │ (bounded)    │     │
//!                  │  └──────────────────────┘   └──────────────┘     │
//!                  │                                                   │
//!                  │  config · lifecycle · observability (cross-cut)   │
//!                  └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod auth;
pub mod config;
pub mod http;
pub mod resilience;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
