//! Structured logging.
//!
//! Pipeline outcomes (authentication results, route misses, breaker
//! transitions, fallback invocations) are emitted as structured tracing
//! events with fields, consumable by whatever collector subscribes.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// gateway and its HTTP middleware.
pub fn init(log_level: &str) {
    let default_filter = format!("api_gateway={log_level},tower_http={log_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
