//! Tower adapter for the access validator.
//!
//! `validate(next, secret)` wraps any HTTP service and returns a service with the
//! same request, response and error types. Rejected requests never reach `next`.
//!
//! Readiness of `next` is only awaited for accepted requests: `call` drives a
//! clone of the inner service with `oneshot`, so a rejection never holds a
//! slot reserved by `poll_ready`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::{Request, Response};
use tower::{Layer, Service, ServiceExt};

use crate::middleware::auth::access::AccessValidator;
use crate::services::auth::{JwtVerifier, Secret, TokenVerifier};

/// Wrap `next` so that it only runs for requests carrying a valid HMAC bearer token.
pub fn validate<S>(next: S, secret: Secret) -> ValidateAccess<S> {
    ValidateAccessLayer::new(AccessValidator::new(secret)).layer(next)
}

/// Layer applying [`ValidateAccess`] to an inner service.
pub struct ValidateAccessLayer<V = JwtVerifier> {
    validator: AccessValidator<V>,
}

impl<V> ValidateAccessLayer<V> {
    pub fn new(validator: AccessValidator<V>) -> Self {
        Self { validator }
    }
}

impl<V> Clone for ValidateAccessLayer<V> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
        }
    }
}

impl<S, V> Layer<S> for ValidateAccessLayer<V> {
    type Service = ValidateAccess<S, V>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidateAccess {
            inner,
            validator: self.validator.clone(),
        }
    }
}

/// Service that runs the access decision before calling `inner`.
pub struct ValidateAccess<S, V = JwtVerifier> {
    inner: S,
    validator: AccessValidator<V>,
}

impl<S: Clone, V> Clone for ValidateAccess<S, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<S, V> std::fmt::Debug for ValidateAccess<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidateAccess")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl<S, V, ReqBody, ResBody> Service<Request<ReqBody>> for ValidateAccess<S, V>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    V: TokenVerifier,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        match self.validator.authorize(req.headers()) {
            Ok(()) => Box::pin(self.inner.clone().oneshot(req)),
            Err(err) => {
                let mut response = Response::new(ResBody::default());
                *response.status_mut() = err.status();
                Box::pin(std::future::ready(Ok::<_, S::Error>(response)))
            }
        }
    }
}
