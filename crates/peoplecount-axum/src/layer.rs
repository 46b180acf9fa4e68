//! Tower middleware that admits requests carrying an honored access token.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use peoplecount_auth_core::{AuthError, AuthGateway};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::context::AuthContext;
use crate::error::AuthRejection;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Tower layer guarding routes with the auth gateway.
#[derive(Clone)]
pub struct AdmissionLayer {
    gateway: Arc<AuthGateway>,
}

impl AdmissionLayer {
    /// Create a layer admitting requests through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<AuthGateway>) -> Self {
        Self { gateway }
    }
}

impl<S> Layer<S> for AdmissionLayer {
    type Service = AdmissionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AdmissionService {
            inner,
            gateway: Arc::clone(&self.gateway),
        }
    }
}

/// The admission service.
#[derive(Clone)]
pub struct AdmissionService<S> {
    inner: S,
    gateway: Arc<AuthGateway>,
}

impl<S> AdmissionService<S> {
    fn admit(&self, req: &Request<Body>) -> Result<AuthContext, AuthError> {
        let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
        self.gateway.admit(token).map(AuthContext::from)
    }
}

impl<S> Service<Request<Body>> for AdmissionService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = AdmissionFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // Admission is synchronous; the handler is only called when it passes
        match self.admit(&req) {
            Ok(context) => {
                req.extensions_mut().insert(context);
                // Use the instance that was driven to readiness
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                AdmissionFuture {
                    state: AdmissionState::Admitted {
                        future: inner.call(req),
                    },
                }
            }
            Err(err) => AdmissionFuture {
                state: AdmissionState::Rejected {
                    response: Some(AuthRejection(err).into_response()),
                },
            },
        }
    }
}

pin_project! {
    /// Future for the admission service.
    pub struct AdmissionFuture<F> {
        #[pin]
        state: AdmissionState<F>,
    }
}

pin_project! {
    #[project = AdmissionStateProj]
    enum AdmissionState<F> {
        Rejected {
            response: Option<Response>,
        },
        Admitted {
            #[pin]
            future: F,
        },
    }
}

impl<F, E> Future for AdmissionFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            AdmissionStateProj::Rejected { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("AdmissionFuture polled after completion"),
            },
            AdmissionStateProj::Admitted { future } => future.poll(cx),
        }
    }
}
