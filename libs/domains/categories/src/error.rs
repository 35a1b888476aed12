use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::PaginationError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found with id: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(id) => AppError::EntityNotFound {
                entity: "Category",
                detail: format!("Category not found with id: {}", id),
            },
            CategoryError::Validation(errors) => AppError::Validation(errors),
            CategoryError::Pagination(err) => AppError::Validation(err.into()),
            CategoryError::Database(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
