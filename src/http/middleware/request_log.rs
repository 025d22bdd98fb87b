//! Request logging middleware.
//!
//! Logs every inbound request, with its tracing headers, before the routed
//! handler runs. The record is written synchronously in `call`, so it lands
//! even when the handler then hangs or drops the connection.

use std::task::{Context, Poll};

use axum::http::Request;
use tower::{Layer, Service};

use crate::http::request::RequestSummary;
use crate::observability::Logger;

#[derive(Debug, Clone)]
pub struct RequestLogLayer {
    logger: Logger,
}

impl RequestLogLayer {
    pub fn new(logger: Logger) -> Self {
        logger.in_scope(|| tracing::info!(function = "request_log", "using middleware"));
        Self { logger }
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog {
            inner,
            logger: self.logger.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestLog<S> {
    inner: S,
    logger: Logger,
}

impl<S, B> Service<Request<B>> for RequestLog<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        RequestSummary::from_request(&request).log(&self.logger, "request");
        self.inner.call(request)
    }
}
