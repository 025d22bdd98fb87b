//! Distributed tracing header extraction.
//!
//! # Responsibilities
//! - Pull W3C (`traceparent`, `tracestate`) and Zipkin B3
//!   (`X-B3-TraceId`, `X-B3-SpanId`) identifiers off an inbound request
//! - Hand them to request logging as four flat string fields
//!
//! Values are propagated into logs verbatim. Nothing is parsed or validated,
//! so a malformed `traceparent` shows up in the log exactly as it was sent.

use axum::http::HeaderMap;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";
pub const B3_TRACE_ID_HEADER: &str = "X-B3-TraceId";
pub const B3_SPAN_ID_HEADER: &str = "X-B3-SpanId";

/// Tracing identifiers carried by a request. Absent headers are empty strings.
/// Logged under the header names, see `RequestSummary::log`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceContext {
    pub traceparent: String,
    pub tracestate: String,
    pub b3_trace_id: String,
    pub b3_span_id: String,
}

impl TraceContext {
    /// Read the tracing headers. Never fails.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            traceparent: header_value(headers, TRACEPARENT_HEADER),
            tracestate: header_value(headers, TRACESTATE_HEADER),
            b3_trace_id: header_value(headers, B3_TRACE_ID_HEADER),
            b3_span_id: header_value(headers, B3_SPAN_ID_HEADER),
        }
    }
}

// First value wins; bytes that are not UTF-8 are replaced rather than dropped.
fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}
