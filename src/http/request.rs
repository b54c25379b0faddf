//! Request identification.
//!
//! # Responsibilities
//! - Ensure every request carries an `x-request-id` before anything logs it
//! - Preserve an inbound id so correlation spans the edge
//!
//! # Design Decisions
//! - UUID v4, generated as early as possible in the layer stack
//! - The id rides the header through to the backend; the forwarding handler
//!   copies headers verbatim, so no extra propagation step is needed

use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderValue, Request},
};
use tower::{Layer, Service};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Layer attaching a request id to requests that lack one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        if !request.headers().contains_key(REQUEST_ID_HEADER) {
            let id = Uuid::new_v4().to_string();
            // A fresh UUID is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
        }
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    #[tokio::test]
    async fn generates_id_when_absent() {
        let service = RequestIdLayer.layer(tower::service_fn(|req: Request<Body>| async move {
            Ok::<_, std::convert::Infallible>(req)
        }));

        let request = Request::builder().body(Body::empty()).unwrap();
        let seen = service.oneshot(request).await.unwrap();
        let id = seen.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn preserves_existing_id() {
        let service = RequestIdLayer.layer(tower::service_fn(|req: Request<Body>| async move {
            Ok::<_, std::convert::Infallible>(req)
        }));

        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "caller-chosen")
            .body(Body::empty())
            .unwrap();
        let seen = service.oneshot(request).await.unwrap();
        assert_eq!(seen.headers()[REQUEST_ID_HEADER], "caller-chosen");
    }
}
