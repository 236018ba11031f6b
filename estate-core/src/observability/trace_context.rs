//! Outbound header propagation for calls to the backend API.
//!
//! Every request gets an `x-request-id` for log correlation on the backend,
//! plus W3C `traceparent`/`tracestate` when an OpenTelemetry span is active.

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

pub const TRACEPARENT_HEADER: &str = "traceparent";

pub const TRACESTATE_HEADER: &str = "tracestate";

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Inject the current span's trace context into `headers`.
///
/// No-op when there is no valid span context (no OTLP pipeline installed).
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = HeaderValue::from_str(&tracestate)
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// Build the propagation headers for one outbound request.
pub fn outbound_headers(request_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    inject_trace_context(&mut headers);

    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    headers
}

/// Attach propagation headers to a reqwest request.
pub trait TracedRequestExt {
    fn traced(self, request_id: &str) -> Self;
}

impl TracedRequestExt for reqwest::RequestBuilder {
    fn traced(self, request_id: &str) -> Self {
        self.headers(outbound_headers(request_id))
    }
}
