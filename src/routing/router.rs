//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile the configured routes at startup
//! - Look up the matching route for a request path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Ordered most-specific-first; lookup is a linear first-match scan
//! - Explicit `None` on no-match rather than a silent default

use axum::http::Uri;

use crate::config::RouteConfig;
use crate::routing::matcher::{PathPattern, PatternError};

/// One compiled route: pattern, backend target, breaker identity.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: PathPattern,
    /// Backend base URI; only scheme and authority are used when forwarding.
    pub backend: Uri,
    /// Breaker identifier; routes sharing it share breaker state.
    pub breaker_id: String,
    /// Human-readable service name for fallback messages.
    pub service_name: String,
}

/// Error raised while compiling the route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("route {index}: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    #[error("route {index}: backend {backend:?} is not a valid URI")]
    Backend { index: usize, backend: String },
}

/// The immutable, specificity-ordered route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile all configured routes and freeze the table.
    pub fn new(configs: &[RouteConfig]) -> Result<Self, RouteTableError> {
        let mut routes = Vec::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            let pattern = PathPattern::parse(&config.path)
                .map_err(|source| RouteTableError::Pattern { index, source })?;
            let backend: Uri =
                config
                    .backend
                    .parse()
                    .map_err(|_| RouteTableError::Backend {
                        index,
                        backend: config.backend.clone(),
                    })?;
            routes.push(Route {
                pattern,
                backend,
                breaker_id: config.breaker.clone(),
                service_name: config.service_name.clone(),
            });
        }

        // Most specific first; stable sort keeps config order among equals.
        routes.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));

        Ok(Self { routes })
    }

    /// Find the route for a request path, most specific match winning.
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.pattern.matches(path))
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
