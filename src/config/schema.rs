//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Authentication settings (shared secret, public paths).
    pub auth: AuthConfig,

    /// Route definitions mapping path patterns to backends.
    pub routes: Vec<RouteConfig>,

    /// Circuit breaker policy, shared by every breaker identifier.
    pub breaker: BreakerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret used to verify inbound bearer tokens.
    pub secret: String,

    /// Path prefixes exempt from authentication. Requests whose path starts
    /// with one of these prefixes are forwarded without a token check.
    pub public_prefixes: Vec<String>,

    /// Header carrying the verified subject to backends.
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Change this in production.
            secret: "MySecureKeyForMicroservicesMustBeVeryLongAndSafe".to_string(),
            public_prefixes: vec![
                "/auth".to_string(),
                "/v3/api-docs".to_string(),
                "/swagger-ui".to_string(),
                "/webjars".to_string(),
                "/error".to_string(),
                "/health".to_string(),
            ],
            identity_header: "X-Authenticated-User".to_string(),
        }
    }
}

/// Route configuration mapping a path pattern to a backend service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern to match. Segments wrapped in braces are variables,
    /// e.g. "/v1/banks/{bankId}/users/{userId}".
    pub path: String,

    /// Backend base URI (scheme + authority), e.g. "http://127.0.0.1:8081".
    pub backend: String,

    /// Circuit breaker identifier. Routes sharing an identifier share
    /// breaker state.
    pub breaker: String,

    /// Human-readable service name used in fallback messages.
    pub service_name: String,
}

/// Circuit breaker policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Number of recent call outcomes kept in the sliding window.
    pub window_size: usize,

    /// Failure ratio within the window that trips the breaker, in (0, 1].
    pub failure_rate_threshold: f64,

    /// Minimum calls in the window before the ratio is evaluated.
    pub min_calls: usize,

    /// Seconds the breaker stays open before permitting a trial call.
    pub open_duration_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            failure_rate_threshold: 0.5,
            min_calls: 5,
            open_duration_secs: 30,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time budget for an inbound request in seconds.
    pub request_secs: u64,

    /// Timeout for a single outbound backend call in seconds.
    pub backend_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            backend_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            auth: AuthConfig::default(),
            routes: default_routes(),
            breaker: BreakerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Route table of the reference deployment: a user-profile service and a
/// profile-photo service behind per-service breakers.
fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            path: "/v1/banks/{bankId}/users".to_string(),
            backend: "http://127.0.0.1:8081".to_string(),
            breaker: "user-profile".to_string(),
            service_name: "User Profile Service".to_string(),
        },
        RouteConfig {
            path: "/v1/banks/{bankId}/users/{userId}".to_string(),
            backend: "http://127.0.0.1:8081".to_string(),
            breaker: "user-profile".to_string(),
            service_name: "User Profile Service".to_string(),
        },
        RouteConfig {
            path: "/v1/banks/{bankId}/users/{userId}/photo".to_string(),
            backend: "http://127.0.0.1:8082".to_string(),
            breaker: "profile-photo".to_string(),
            service_name: "Profile Photo Service".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.breaker.min_calls, 5);
        assert_eq!(config.routes.len(), 3);
        assert!(config.auth.public_prefixes.contains(&"/auth".to_string()));
    }

    #[test]
    fn routes_override_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[routes]]
            path = "/v1/orders"
            backend = "http://127.0.0.1:9000"
            breaker = "orders"
            service_name = "Order Service"
            "#,
        )
        .unwrap();
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].breaker, "orders");
    }

    #[test]
    fn breaker_section_parses() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [breaker]
            window_size = 20
            failure_rate_threshold = 0.25
            min_calls = 10
            open_duration_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.breaker.window_size, 20);
        assert_eq!(config.breaker.failure_rate_threshold, 0.25);
    }
}
