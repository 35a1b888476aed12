use axum::{http::StatusCode, response::Response};
use axum::response::IntoResponse;

use super::{ErrorCode, ProblemDetail};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    ProblemDetail::new(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        "Not Found",
        "The requested resource was not found",
    )
    .into_response()
}
