//! Products API routes

use axum::Router;
use domain_categories::PgCategoryRepository;
use domain_products::{PgProductRepository, ProductService, handlers};
use std::sync::Arc;

use crate::state::AppState;

pub type PgProductService = ProductService<PgProductRepository, PgCategoryRepository>;

pub fn service(state: &AppState) -> PgProductService {
    ProductService::new(
        PgProductRepository::new(state.db.clone()),
        Arc::new(PgCategoryRepository::new(state.db.clone())),
    )
}

/// Create products router
pub fn router(state: &AppState) -> Router {
    handlers::router(service(state))
}
