//! Fault injection middleware
//!
//! Asks the [`ChaosDispatcher`] for a plan on every request and applies it
//! around the inner service. Latency is slept on the request's own task
//! before the inner service runs. Status faults let the inner service run to
//! completion, so messages are still published, and then replace what it
//! answered. The client therefore sees the faulted response only once the
//! handler has finished.
//!
//! Excluded prefixes are compared against the normalized path, the same form
//! the router resolves, so `/Internal/Health/` is excluded by `/internal/health`.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use application::{ChaosDispatcher, FaultPlan};
use axum::{
    extract::Request,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::StatusCodeFault;
use tower::{Layer, Service};
use tracing::debug;

use crate::routes::normalize_path;

/// Layer that injects configured faults
#[derive(Clone, Debug)]
pub struct ChaosLayer {
    dispatcher: ChaosDispatcher,
    excluded_paths: Vec<String>,
}

impl ChaosLayer {
    #[must_use]
    pub const fn new(dispatcher: ChaosDispatcher) -> Self {
        Self {
            dispatcher,
            excluded_paths: Vec::new(),
        }
    }

    /// Add path prefixes that are never subjected to faults
    #[must_use]
    pub fn exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths.extend(paths.iter().map(|path| normalize_path(path)));
        self
    }
}

impl<S> Layer<S> for ChaosLayer {
    type Service = ChaosService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ChaosService {
            inner,
            dispatcher: self.dispatcher.clone(),
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for fault injection
#[derive(Clone, Debug)]
pub struct ChaosService<S> {
    inner: S,
    dispatcher: ChaosDispatcher,
    excluded_paths: Vec<String>,
}

impl<S> ChaosService<S> {
    fn is_excluded(&self, path: &str) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }
        let path = normalize_path(path);
        self.excluded_paths.iter().any(|p| path.starts_with(p.as_str()))
    }
}

impl<S> Service<Request> for ChaosService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let plan = if self.is_excluded(req.uri().path()) {
            FaultPlan::PassThrough
        } else {
            self.dispatcher.plan()
        };

        // The clone may not be ready; swap so the ready one serves this call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match plan {
                FaultPlan::PassThrough => inner.call(req).await,
                FaultPlan::Delay(delay) => {
                    debug!(?delay, "Delaying request");
                    tokio::time::sleep(delay).await;
                    inner.call(req).await
                },
                FaultPlan::Status(fault) => {
                    let response = inner.call(req).await?;
                    Ok(override_status(response, &fault))
                },
            }
        })
    }
}

/// Replace a response according to a status fault
///
/// Without a body only the status changes. With a body the inner response
/// is dropped entirely.
pub fn override_status(mut response: Response, fault: &StatusCodeFault) -> Response {
    let status =
        StatusCode::from_u16(fault.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match fault.body() {
        Some(body) => (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body.to_string(),
        )
            .into_response(),
        None => {
            *response.status_mut() = status;
            response
        },
    }
}
