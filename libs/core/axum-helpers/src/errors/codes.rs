//! Type-safe error codes for API responses.
//!
//! Each code carries:
//! - a string identifier for clients (e.g. `"VALIDATION_ERROR"`)
//! - an integer for logs and dashboards (e.g. `1001`)
//! - the default problem title and detail
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.title(), "Validation Failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Bean-style constraint validation failed
    ValidationError,

    /// Request body is not valid JSON for the target type
    MalformedRequest,

    /// Path or query parameter could not be converted to the expected type
    TypeMismatch,

    /// Generic bad request
    BadRequest,

    /// Requested resource was not found
    NotFound,

    /// Caller lacks permission
    Forbidden,

    /// Request conflicts with current resource state
    Conflict,

    // Server errors (9000s)
    /// Unexpected failure
    InternalError,

    /// Dependency unavailable
    ServiceUnavailable,

    /// Database query or connection failure
    DatabaseError,

    /// File system failure
    IoError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    /// Integer code used as the `error_code` log field.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::MalformedRequest => 1002,
            Self::TypeMismatch => 1003,
            Self::BadRequest => 1004,
            Self::NotFound => 1005,
            Self::Forbidden => 1006,
            Self::Conflict => 1007,
            Self::InternalError => 9001,
            Self::ServiceUnavailable => 9002,
            Self::DatabaseError => 9003,
            Self::IoError => 9004,
        }
    }

    /// Default problem `title`.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation Failed",
            Self::MalformedRequest => "Malformed Request",
            Self::TypeMismatch => "Type Mismatch",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Entity Not Found",
            Self::Forbidden => "Access Denied",
            Self::Conflict => "Conflict",
            Self::InternalError
            | Self::DatabaseError
            | Self::IoError => "Internal Server Error",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Default problem `detail` for codes whose real cause must not leak.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation error",
            Self::MalformedRequest => "Request body could not be read",
            Self::TypeMismatch => "Parameter has the wrong type",
            Self::BadRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::Forbidden => "Access denied",
            Self::Conflict => "Request conflicts with the current state",
            Self::InternalError | Self::DatabaseError | Self::IoError => {
                "An unexpected error occurred"
            }
            Self::ServiceUnavailable => "Service temporarily unavailable",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.code() >= 9000
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
