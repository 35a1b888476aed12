use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::PaginationError;
use domain_categories::CategoryError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found with id: {0}")]
    NotFound(i64),

    #[error("Category not found with id: {0}")]
    CategoryNotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::EntityNotFound {
                entity: "Product",
                detail: format!("Product not found with id: {}", id),
            },
            ProductError::CategoryNotFound(id) => AppError::EntityNotFound {
                entity: "Category",
                detail: format!("Category not found with id: {}", id),
            },
            ProductError::Validation(errors) => AppError::Validation(errors),
            ProductError::Pagination(err) => AppError::Validation(err.into()),
            ProductError::Category(err) => err.into(),
            ProductError::Database(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
