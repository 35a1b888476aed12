//! Reusable OpenAPI response types for consistent API documentation.

use super::ProblemDetail;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/problem+json",
    example = json!({
        "type": "about:blank",
        "title": "Internal Server Error",
        "status": 500,
        "detail": "An unexpected error occurred",
        "timestamp": "2025-01-01T12:00:00Z",
        "code": "INTERNAL_ERROR"
    })
)]
pub struct InternalServerErrorResponse(pub ProblemDetail);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Failed",
    content_type = "application/problem+json",
    example = json!({
        "type": "about:blank",
        "title": "Validation Failed",
        "status": 400,
        "detail": "Validation error",
        "timestamp": "2025-01-01T12:00:00Z",
        "code": "VALIDATION_ERROR",
        "errors": { "name": "must not be blank" }
    })
)]
pub struct BadRequestValidationResponse(pub ProblemDetail);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Type Mismatch",
    content_type = "application/problem+json",
    example = json!({
        "type": "about:blank",
        "title": "Type Mismatch",
        "status": 400,
        "detail": "Invalid id 'abc': expected a positive integer",
        "timestamp": "2025-01-01T12:00:00Z",
        "code": "TYPE_MISMATCH"
    })
)]
pub struct BadRequestTypeMismatchResponse(pub ProblemDetail);

#[derive(ToResponse)]
#[response(
    description = "Not Found",
    content_type = "application/problem+json",
    example = json!({
        "type": "about:blank",
        "title": "Product Not Found",
        "status": 404,
        "detail": "Product not found with id 42",
        "timestamp": "2025-01-01T12:00:00Z",
        "code": "NOT_FOUND"
    })
)]
pub struct NotFoundResponse(pub ProblemDetail);

#[derive(ToResponse)]
#[response(
    description = "Conflict",
    content_type = "application/problem+json",
    example = json!({
        "type": "about:blank",
        "title": "Conflict",
        "status": 409,
        "detail": "An export to '/tmp/products.csv' is already running",
        "timestamp": "2025-01-01T12:00:00Z",
        "code": "CONFLICT"
    })
)]
pub struct ConflictResponse(pub ProblemDetail);
