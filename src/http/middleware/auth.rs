//! Bearer authentication layer.
//!
//! Wraps any `(request) -> response` service with the [`Gate`]. Allowed
//! requests reach the inner service untouched and its response is returned
//! as-is; denied requests never reach it.

use std::collections::HashSet;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, Method, Request, Response};
use futures_util::future::{self, Either, Ready};
use tower::{Layer, Service};

use crate::http::response::unauthorized;
use crate::observability::metrics;
use crate::security::{AuthDecision, Gate};

/// Kind of exchange carried by an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeKind {
    /// Ordinary request/response.
    Http,
    /// WebSocket opening handshake: `GET` with `Connection: upgrade` and
    /// `Upgrade: websocket`.
    WebSocket,
}

impl ExchangeKind {
    pub fn of<B>(request: &Request<B>) -> Self {
        let headers = request.headers();
        let connection_upgrade = headers
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
        let websocket = headers
            .get(header::UPGRADE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("websocket"));

        if request.method() == Method::GET && connection_upgrade && websocket {
            ExchangeKind::WebSocket
        } else {
            ExchangeKind::Http
        }
    }
}

/// Layer that places a [`Gate`] in front of a service.
#[derive(Debug, Clone)]
pub struct BearerAuthLayer {
    gate: Arc<Gate>,
    exempt_paths: Arc<HashSet<String>>,
    upgrade_paths: Arc<HashSet<String>>,
}

impl BearerAuthLayer {
    pub fn new(gate: Arc<Gate>) -> Self {
        Self {
            gate,
            exempt_paths: Arc::new(HashSet::new()),
            upgrade_paths: Arc::new(HashSet::new()),
        }
    }

    /// Paths (exact match) forwarded without a credential.
    pub fn with_exempt_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.exempt_paths = Arc::new(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Paths (exact match) whose handler completes a WebSocket handshake.
    /// Only a handshake on one of these leaves request/response semantics and
    /// skips the check. Anything else, whatever its headers, is gated.
    pub fn with_upgrade_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.upgrade_paths = Arc::new(paths.into_iter().map(Into::into).collect());
        self
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuth {
            inner,
            gate: Arc::clone(&self.gate),
            exempt_paths: Arc::clone(&self.exempt_paths),
            upgrade_paths: Arc::clone(&self.upgrade_paths),
        }
    }
}

/// Service produced by [`BearerAuthLayer`].
#[derive(Debug, Clone)]
pub struct BearerAuth<S> {
    inner: S,
    gate: Arc<Gate>,
    exempt_paths: Arc<HashSet<String>>,
    upgrade_paths: Arc<HashSet<String>>,
}

impl<S> BearerAuth<S> {
    fn decide<B>(&self, request: &Request<B>) -> AuthDecision {
        let path = request.uri().path();
        if ExchangeKind::of(request) == ExchangeKind::WebSocket && self.upgrade_paths.contains(path) {
            tracing::debug!(path = %path, "WebSocket handshake bypasses bearer check");
            return AuthDecision::Allowed;
        }
        if self.exempt_paths.contains(path) {
            return AuthDecision::Allowed;
        }

        let decision = self.gate.authorize(request.headers());
        metrics::record_auth_decision(decision.as_str());
        decision
    }
}

impl<S, B, ResBody> Service<Request<B>> for BearerAuth<S>
where
    S: Service<Request<B>, Response = Response<ResBody>>,
    ResBody: From<&'static str>,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Either<S::Future, Ready<Result<Self::Response, Self::Error>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        match self.decide(&request) {
            AuthDecision::Allowed => Either::Left(self.inner.call(request)),
            AuthDecision::Denied(reason) => {
                tracing::warn!(
                    reason = %reason,
                    method = %request.method(),
                    path = %request.uri().path(),
                    "Request rejected"
                );
                Either::Right(future::ready(Ok(unauthorized(reason))))
            }
        }
    }
}
