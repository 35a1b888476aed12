use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_products::ProductError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filePath must not be blank")]
    BlankPath,

    #[error("An export to {0} is already running")]
    PathBusy(String),

    #[error("Export job not found with id: {0}")]
    JobNotFound(i64),

    #[error("Export job {job_id} failed: {message}")]
    JobFailed { job_id: i64, message: String },

    #[error("Writer is already closed")]
    WriterClosed,

    #[error("Writer is not open")]
    WriterNotOpen,

    #[error("Failed to read products: {0}")]
    Read(#[from] ProductError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Export task did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type ExportResult<T> = Result<T, ExportError>;

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::BlankPath => AppError::BadRequest(err.to_string()),
            ExportError::PathBusy(_) => AppError::Conflict(err.to_string()),
            ExportError::JobNotFound(id) => AppError::EntityNotFound {
                entity: "Job",
                detail: format!("Export job not found with id: {}", id),
            },
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ExportError::BlankPath, StatusCode::BAD_REQUEST),
            (
                ExportError::PathBusy("/tmp/a.csv".into()),
                StatusCode::CONFLICT,
            ),
            (ExportError::JobNotFound(4), StatusCode::NOT_FOUND),
            (
                ExportError::JobFailed {
                    job_id: 1,
                    message: "disk full".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
