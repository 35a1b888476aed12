//! Request metrics for the catalog API routes.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response, StatusCode},
    middleware::Next,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Records one request against its route template.
///
/// - `http_requests_total{method, route, status, status_class}`
/// - `http_request_duration_seconds{method, route}`
/// - `http_requests_errors_total{method, route, status}` for 4xx/5xx
///
/// Attach with `route_layer` so the matched template (`/products/{id}`)
/// is the label rather than the raw URI; unmatched requests fall back to
/// the URI path.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let route = match matched_path {
        Some(path) => path.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };

    let response = next.run(request).await;

    let status = response.status();
    let code = status.as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => code.clone(),
        "status_class" => status_class(status)
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "route" => route.clone()
    )
    .record(started.elapsed().as_secs_f64());

    if status.is_client_error() || status.is_server_error() {
        counter!(
            "http_requests_errors_total",
            "method" => method,
            "route" => route,
            "status" => code
        )
        .increment(1);
    }

    response
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() / 100 {
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}
