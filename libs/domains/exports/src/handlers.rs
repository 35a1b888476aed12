use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::{
    IdPath, ValidatedQuery,
    errors::responses::{
        BadRequestTypeMismatchResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use domain_products::ProductRepository;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};
use validator::Validate;

use crate::error::ExportResult;
use crate::job::{ExportFormat, JobExecution, JobStatus, StepExecution};
use crate::service::ExportService;

pub const TAG: &str = "exports";

/// `?filePath=` for the export triggers
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Destination file on the server; an existing file is replaced
    pub file_path: String,
}

/// OpenAPI documentation for the export endpoints
#[derive(OpenApi)]
#[openapi(
    paths(export_csv, export_json, export_xlsx, list_jobs, get_job),
    components(
        schemas(JobExecution, StepExecution, JobStatus, ExportFormat),
        responses(
            NotFoundResponse,
            ConflictResponse,
            BadRequestTypeMismatchResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product export jobs")
    )
)]
pub struct ApiDoc;

/// Create the export router
pub fn router<R: ProductRepository + 'static>(service: ExportService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/csv", post(export_csv))
        .route("/json", post(export_json))
        .route("/xlsx", post(export_xlsx))
        .route("/jobs", get(list_jobs))
        .route("/jobs/{id}", get(get_job))
        .with_state(shared_service)
}

async fn run<R: ProductRepository + 'static>(
    service: &ExportService<R>,
    format: ExportFormat,
    query: ExportQuery,
) -> ExportResult<Json<i64>> {
    let job = service.export(format, &query.file_path).await?;
    Ok(Json(job.id))
}

/// Export all products as CSV; returns the job id
#[utoipa::path(
    post,
    path = "/csv",
    tag = TAG,
    params(ExportQuery),
    responses(
        (status = 200, description = "Job id", body = i64),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn export_csv<R: ProductRepository + 'static>(
    State(service): State<Arc<ExportService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ExportQuery>,
) -> ExportResult<Json<i64>> {
    run(&service, ExportFormat::Csv, query).await
}

/// Export all products as a JSON array; returns the job id
#[utoipa::path(
    post,
    path = "/json",
    tag = TAG,
    params(ExportQuery),
    responses(
        (status = 200, description = "Job id", body = i64),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn export_json<R: ProductRepository + 'static>(
    State(service): State<Arc<ExportService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ExportQuery>,
) -> ExportResult<Json<i64>> {
    run(&service, ExportFormat::Json, query).await
}

/// Export all products as an XLSX workbook; returns the job id
#[utoipa::path(
    post,
    path = "/xlsx",
    tag = TAG,
    params(ExportQuery),
    responses(
        (status = 200, description = "Job id", body = i64),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn export_xlsx<R: ProductRepository + 'static>(
    State(service): State<Arc<ExportService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ExportQuery>,
) -> ExportResult<Json<i64>> {
    run(&service, ExportFormat::Xlsx, query).await
}

#[utoipa::path(
    get,
    path = "/jobs",
    tag = TAG,
    responses(
        (status = 200, description = "All export jobs", body = Vec<JobExecution>)
    )
)]
async fn list_jobs<R: ProductRepository + 'static>(
    State(service): State<Arc<ExportService<R>>>,
) -> Json<Vec<JobExecution>> {
    Json(service.list_jobs().await)
}

#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = JobExecution),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_job<R: ProductRepository + 'static>(
    State(service): State<Arc<ExportService<R>>>,
    IdPath(id): IdPath,
) -> ExportResult<Json<JobExecution>> {
    Ok(Json(service.get_job(id).await?))
}
