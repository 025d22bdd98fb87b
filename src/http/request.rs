//! Request metadata shared by every log record.
//!
//! The interceptor and the hang/drop handlers all log the same shape: where
//! the request came from, what it asked for, and its tracing identifiers.

use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::Request};

use crate::observability::{Logger, TraceContext};

/// Snapshot of the parts of a request worth logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSummary {
    /// Remote address, empty when the transport did not supply one.
    pub from: String,
    pub method: String,
    pub url: String,
    pub trace: TraceContext,
}

impl RequestSummary {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let from = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        Self {
            from,
            method: request.method().to_string(),
            url: request.uri().to_string(),
            trace: TraceContext::from_headers(request.headers()),
        }
    }

    /// Emit one INFO record carrying this summary.
    pub fn log(&self, logger: &Logger, message: &str) {
        logger.in_scope(|| {
            tracing::info!(
                from = %self.from,
                method = %self.method,
                url = %self.url,
                traceparent = %self.trace.traceparent,
                tracestate = %self.trace.tracestate,
                "X-B3-TraceId" = %self.trace.b3_trace_id,
                "X-B3-SpanId" = %self.trace.b3_span_id,
                "{message}"
            )
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn summary_reads_connect_info_and_headers() {
        let mut request = Request::post("/dropNoisy?attempt=2")
            .header("traceparent", "abc123")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("10.1.2.3:4567".parse::<SocketAddr>().unwrap()));

        let summary = RequestSummary::from_request(&request);
        assert_eq!(summary.from, "10.1.2.3:4567");
        assert_eq!(summary.method, "POST");
        assert_eq!(summary.url, "/dropNoisy?attempt=2");
        assert_eq!(summary.trace.traceparent, "abc123");
        assert_eq!(summary.trace.tracestate, "");
    }

    #[test]
    fn missing_connect_info_leaves_from_empty() {
        let request = Request::get("/hi").body(()).unwrap();
        assert_eq!(RequestSummary::from_request(&request).from, "");
    }
}
