//! Correlation id propagation.
//!
//! [`correlation_id_middleware`] takes the inbound `x-correlation-id` header
//! (or mints a UUID v4), keeps it in a task-local for the rest of the request,
//! records it on the current span and echoes it on the response. Outbound HTTP
//! clients read it back with [`current_correlation_id`].

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

const MAX_CORRELATION_ID_LEN: usize = 128;

tokio::task_local! {
    static CORRELATION_ID: String;
}

/// Correlation id of the request being served on this task, if any.
pub fn current_correlation_id() -> Option<String> {
    CORRELATION_ID.try_with(|id| id.clone()).ok()
}

/// Runs `fut` with `id` as the current correlation id.
///
/// Useful for background work that should keep the id of the request that
/// spawned it.
pub async fn with_correlation_id<F>(id: String, fut: F) -> F::Output
where
    F: std::future::Future,
{
    CORRELATION_ID.scope(id, fut).await
}

pub async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(&CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| is_acceptable(value))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(value) = HeaderValue::from_str(&id) {
        request.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    tracing::Span::current().record("correlation_id", id.as_str());

    let mut response = CORRELATION_ID.scope(id.clone(), next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

fn is_acceptable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_CORRELATION_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
