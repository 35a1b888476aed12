//! Export API routes

use axum::Router;
use domain_exports::{ExportService, handlers};
use domain_products::PgProductRepository;
use std::sync::Arc;

use crate::state::AppState;

/// Create export router; jobs land in the shared registry
pub fn router(state: &AppState) -> Router {
    let service = ExportService::new(
        Arc::new(PgProductRepository::new(state.db.clone())),
        Arc::clone(&state.jobs),
        state.config.export.chunk_size,
    );
    handlers::router(service)
}
