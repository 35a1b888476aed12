//! Custom extractors for Axum handlers.
//!
//! Every rejection is an [`AppError`](crate::AppError), so malformed input
//! produces the same problem body as any other error.

pub mod id_path;
pub mod validated_json;
pub mod validated_query;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
