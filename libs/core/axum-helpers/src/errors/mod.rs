pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use crate::correlation::current_correlation_id;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

pub const PROBLEM_JSON: &str = "application/problem+json";

/// Problem detail body returned for every error.
///
/// ```json
/// {
///   "type": "about:blank",
///   "title": "Validation Failed",
///   "status": 400,
///   "detail": "Validation error",
///   "timestamp": "2025-01-01T12:00:00Z",
///   "code": "VALIDATION_ERROR",
///   "errors": { "name": "must not be blank" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
    pub code: ErrorCode,
    /// Correlation id of the request that failed, when one is in scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Field name to message, only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ProblemDetail {
    pub fn new(
        status: StatusCode,
        code: ErrorCode,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            problem_type: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            timestamp: Utc::now(),
            code,
            correlation_id: current_correlation_id(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: BTreeMap<String, String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl IntoResponse for ProblemDetail {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(self)).into_response()
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type, so the
/// translation to a problem body happens in exactly one place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON extraction error: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Path extraction error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Not found with an entity-specific title, e.g. "Product Not Found"
    #[error("{entity} not found: {detail}")]
    EntityNotFound { entity: &'static str, detail: String },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Builds the problem body, logging at a level that matches the severity.
    pub fn to_problem(&self) -> ProblemDetail {
        match self {
            AppError::Validation(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {}",
                    e
                );
                problem(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, None)
                    .with_errors(validation_messages(e))
            }
            AppError::JsonRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::MalformedRequest.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                problem(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::MalformedRequest,
                    Some(e.body_text()),
                )
            }
            AppError::QueryRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::TypeMismatch.code(),
                    "Query extraction error: {:?}",
                    e
                );
                problem(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::TypeMismatch,
                    Some(e.body_text()),
                )
            }
            AppError::PathRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::TypeMismatch.code(),
                    "Path extraction error: {:?}",
                    e
                );
                problem(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::TypeMismatch,
                    Some(e.body_text()),
                )
            }
            AppError::TypeMismatch(msg) => {
                tracing::warn!(error_code = ErrorCode::TypeMismatch.code(), "Type mismatch: {}", msg);
                problem(StatusCode::BAD_REQUEST, ErrorCode::TypeMismatch, Some(msg.clone()))
            }
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                problem(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, None)
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                problem(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::IoError, None)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                problem(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, Some(msg.clone()))
            }
            AppError::EntityNotFound { entity, detail } => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    entity = entity,
                    "Not found: {}",
                    detail
                );
                ProblemDetail::new(
                    StatusCode::NOT_FOUND,
                    ErrorCode::NotFound,
                    format!("{} Not Found", entity),
                    detail.clone(),
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                problem(StatusCode::NOT_FOUND, ErrorCode::NotFound, Some(msg.clone()))
            }
            AppError::Forbidden(msg) => {
                tracing::info!(error_code = ErrorCode::Forbidden.code(), "Forbidden: {}", msg);
                problem(StatusCode::FORBIDDEN, ErrorCode::Forbidden, Some(msg.clone()))
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                problem(StatusCode::CONFLICT, ErrorCode::Conflict, Some(msg.clone()))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                problem(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(
                    error_code = ErrorCode::ServiceUnavailable.code(),
                    "Service unavailable: {}",
                    msg
                );
                problem(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::ServiceUnavailable,
                    Some(msg.clone()),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_problem().into_response()
    }
}

fn problem(status: StatusCode, code: ErrorCode, detail: Option<String>) -> ProblemDetail {
    let detail = detail.unwrap_or_else(|| code.default_message().to_string());
    ProblemDetail::new(status, code, code.title(), detail)
}

/// Flattens validator output into `field -> first message`.
///
/// Struct-level (schema) failures are reported under `__all__`, the key the
/// validator crate uses for them.
pub fn validation_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}
