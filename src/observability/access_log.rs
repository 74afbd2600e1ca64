//! Per-request access log in the compact development format:
//! `GET /api/users 200 1.234 ms - 52`.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;
use crate::routing::ApiPrefix;

/// Format one access-log line. `-` stands in for an unknown length.
pub fn dev_line(
    method: &str,
    path: &str,
    status: StatusCode,
    elapsed: Duration,
    content_length: Option<u64>,
) -> String {
    let length = content_length.map_or_else(|| "-".to_string(), |len| len.to_string());
    format!(
        "{} {} {} {:.3} ms - {}",
        method,
        path,
        status.as_u16(),
        elapsed.as_secs_f64() * 1000.0,
        length
    )
}

pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
    let mount = ApiPrefix::of_path(request.uri().path()).map_or("edge", ApiPrefix::label);

    let response = next.run(request).await;

    let status = response.status();
    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let line = dev_line(&method, &path, status, start.elapsed(), content_length);
    if status.is_server_error() {
        tracing::warn!(mount, "{}", line);
    } else {
        tracing::info!(mount, "{}", line);
    }
    metrics::record_request(&method, status.as_u16(), mount, start);

    response
}
