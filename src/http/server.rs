//! HTTP server setup and the forwarding pipeline.
//!
//! # Responsibilities
//! - Create the Axum router and wire the pipeline stages in order:
//!   tracing → request id → request timeout → authentication → dispatch
//! - Look up the route, consult its circuit breaker, forward to the backend
//! - Record call outcomes and serve the fallback on rejection or failure
//! - Serve the gateway's own health endpoint
//!
//! # Design Decisions
//! - One wildcard handler dispatches every proxied request; the route table
//!   decides the target, never the Axum router
//! - The outbound call lives inside the handler future: a client disconnect
//!   or pipeline timeout drops it, cancelling the backend call, and the
//!   breaker permit resolves safely on drop
//! - Backend 4xx relays verbatim and counts as a success (the backend
//!   answered); only 5xx, timeout, and connect errors are breaker failures

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::filter::{authentication_middleware, AuthGate};
use crate::config::GatewayConfig;
use crate::http::request::RequestIdLayer;
use crate::http::response::{fallback_response, no_route_response};
use crate::resilience::{BreakerPolicy, BreakerRegistry, Outcome};
use crate::routing::{RouteTable, RouteTableError};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub breakers: Arc<BreakerRegistry>,
    pub auth: Arc<AuthGate>,
    pub client: Client<HttpConnector, Body>,
    pub backend_timeout: Duration,
}

/// Error raised while assembling the pipeline from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerInitError {
    #[error("route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error("auth.identity_header is not a valid header name: {0}")]
    IdentityHeader(#[from] axum::http::header::InvalidHeaderName),
}

/// The assembled gateway server.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Compile routes, build the breaker registry and auth gate, and wire
    /// the pipeline. Configuration is consumed once; nothing here mutates
    /// afterwards.
    pub fn new(config: &GatewayConfig) -> Result<Self, ServerInitError> {
        let routes = Arc::new(RouteTable::new(&config.routes)?);
        let breakers = Arc::new(BreakerRegistry::new(BreakerPolicy::from(&config.breaker)));
        let auth = Arc::new(AuthGate::new(&config.auth)?);
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            routes,
            breakers,
            auth,
            client,
            backend_timeout: Duration::from_secs(config.timeouts.backend_secs),
        };

        Ok(Self {
            router: Self::build_router(config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {},
                    _ = crate::lifecycle::wait_for_signal() => {},
                }
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }
}

/// The gateway's own liveness probe.
async fn health_handler() -> &'static str {
    "Gateway OK"
}

/// Main pipeline handler: route lookup, breaker check, forward, fallback.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    // 1. Route lookup; the most specific pattern wins.
    let route = match state.routes.find(&path) {
        Some(route) => route,
        None => {
            tracing::warn!(method = %method, path = %path, "no route matched");
            return no_route_response();
        }
    };

    // 2. Breaker admission. Rejected calls never reach the backend and are
    //    not recorded as outcomes.
    let breaker = state.breakers.get_or_create(&route.breaker_id);
    let permit = match breaker.try_acquire() {
        Ok(permit) => permit,
        Err(rejection) => {
            tracing::warn!(
                breaker = %rejection.id,
                path = %path,
                "breaker rejected call, serving fallback"
            );
            return fallback_response(&route.service_name);
        }
    };

    // 3. Re-target the request at the backend, preserving method, headers,
    //    query, and body.
    let outbound = match retarget(request, &route.backend) {
        Ok(outbound) => outbound,
        Err(response) => return response,
    };

    // 4. Forward under the bounded backend timeout.
    match tokio::time::timeout(state.backend_timeout, state.client.request(outbound)).await {
        Ok(Ok(response)) => {
            let status = response.status();
            if status.is_server_error() {
                permit.record(Outcome::Failure);
                tracing::warn!(
                    breaker = %route.breaker_id,
                    path = %path,
                    status = %status,
                    "backend reported server error, serving fallback"
                );
                return fallback_response(&route.service_name);
            }

            permit.record(Outcome::Success);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Ok(Err(error)) => {
            permit.record(Outcome::Failure);
            tracing::error!(
                breaker = %route.breaker_id,
                path = %path,
                error = %error,
                "backend call failed, serving fallback"
            );
            fallback_response(&route.service_name)
        }
        Err(_elapsed) => {
            permit.record(Outcome::Failure);
            tracing::error!(
                breaker = %route.breaker_id,
                path = %path,
                timeout = ?state.backend_timeout,
                "backend call timed out, serving fallback"
            );
            fallback_response(&route.service_name)
        }
    }
}

/// Swap the request's scheme and authority for the backend's, keeping the
/// inbound path and query.
fn retarget(request: Request<Body>, backend: &Uri) -> Result<Request<Body>, Response> {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(backend.scheme().cloned().unwrap_or(Scheme::HTTP));
    uri_parts.authority = backend.authority().cloned();
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }

    parts.uri = Uri::from_parts(uri_parts).map_err(|error| {
        tracing::error!(error = %error, "failed to build backend URI");
        StatusCode::BAD_GATEWAY.into_response()
    })?;

    Ok(Request::from_parts(parts, body))
}
