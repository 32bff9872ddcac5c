//! Authentication middleware for the shared api key.

use std::{
    convert::Infallible,
    future::{ready, Ready},
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::Either;
use tower::{Layer, Service};

use super::{ApiKey, API_KEY_HEADER};
use crate::error::ServerError;

/// Authentication middleware.
///
/// Rejects every request whose `x-api-key` header does not equal the
/// configured key with `401 {"error":"unauthorized"}`.
#[derive(Debug, Clone)]
pub struct ApiKeyAuthLayer {
    key: ApiKey,
}

impl ApiKeyAuthLayer {
    /// Create a new api key authentication layer.
    pub fn new(key: ApiKey) -> Self {
        Self { key }
    }
}

impl<S> Layer<S> for ApiKeyAuthLayer {
    type Service = ApiKeyAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuth {
            inner,
            key: self.key.clone(),
        }
    }
}

/// Authentication middleware.
///
/// See [`ApiKeyAuthLayer`].
#[derive(Debug, Clone)]
pub struct ApiKeyAuth<S> {
    inner: S,
    key: ApiKey,
}

impl<S> Service<Request> for ApiKeyAuth<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Either<Ready<Result<Response, Infallible>>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let authorized = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| self.key.matches(value))
            .unwrap_or(false);

        if !authorized {
            tracing::info!(path = %req.uri().path(), "rejected request with invalid api key");
            let response = ServerError::unauthorized("missing or mismatching api key").into_response();
            return Either::Left(ready(Ok(response)));
        }

        tracing::debug!("authenticated");
        Either::Right(self.inner.call(req))
    }
}
