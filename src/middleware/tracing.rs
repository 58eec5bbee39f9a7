// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Assigns x-request-id headers and wraps every request in an http_request span
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, Request, Response},
    Router,
};
use tower_http::{
    classify::ServerErrorsFailureClass,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};

/// Header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn make_span(request: &Request<Body>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    info_span!(
        "http_request",
        method = %request.method(),
        path = %path,
        request_id = %request_id,
    )
}

fn on_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status().as_u16();
    if status >= 500 {
        error!(status, latency_ms = %latency.as_millis(), "request failed with server error");
    } else {
        info!(status, latency_ms = %latency.as_millis(), "request completed");
    }
}

fn on_failure(failure: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    error!(error = %failure, latency_ms = %latency.as_millis(), "request failed");
}

/// Wrap a router with request ids and per-request spans
///
/// Layer order matters: the id is set before the trace span is created so
/// the span can record it, and propagated onto the response afterwards.
#[must_use]
pub fn with_request_tracing(router: Router) -> Router {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span)
                .on_response(on_response)
                .on_failure(on_failure),
        )
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}
