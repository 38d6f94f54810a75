//! Request metrics middleware.
//! Records count and latency per matched route template.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

/// Applied with `route_layer` so the matched route template is available.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(method = %method, route = %route, status = %status, "Request failed");
    }
    metrics::record_request(&method, &route, status.as_u16(), start);
    response
}
