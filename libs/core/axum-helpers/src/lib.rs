//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: Problem-detail error responses with error codes
//! - **[`extractors`]**: Validated JSON/query and numeric id path extractors
//! - **[`correlation`]**: Correlation id middleware and task-local access
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::{cors_layer_from_env, create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes, cors_layer_from_env()?);
//!
//!     let config = ServerConfig::default();
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod correlation;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use correlation::{
    CORRELATION_ID_HEADER, correlation_id_middleware, current_correlation_id, with_correlation_id,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, PROBLEM_JSON, ProblemDetail};

pub use extractors::{IdPath, ValidatedJson, ValidatedQuery};
