//! Categories API routes, including the category-scoped product routes

use axum::Router;
use domain_categories::{CategoryService, PgCategoryRepository, handlers};
use domain_products::handlers::category_products_router;

use crate::state::AppState;

pub fn service(state: &AppState) -> CategoryService<PgCategoryRepository> {
    CategoryService::new(PgCategoryRepository::new(state.db.clone()))
}

/// Create categories router
pub fn router(state: &AppState) -> Router {
    handlers::router(service(state)).merge(category_products_router(super::products::service(state)))
}
