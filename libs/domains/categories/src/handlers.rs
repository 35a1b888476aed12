use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    IdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestTypeMismatchResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use database::{Page, PageParams, Slice};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{Category, CategoryFilter, CreateCategory, NameQuery, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

pub const TAG: &str = "categories";

/// OpenAPI documentation for Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        list_categories_paged,
        create_category,
        get_category,
        update_category,
        delete_category,
        search_categories,
        search_categories_paged,
        search_categories_slice,
        filter_categories,
        filter_categories_slice,
    ),
    components(
        schemas(Category, CreateCategory, UpdateCategory, CategoryFilter, Page<Category>, Slice<Category>),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestTypeMismatchResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Category management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the category router with all HTTP endpoints
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/paged", get(list_categories_paged))
        .route("/search", get(search_categories))
        .route("/search/paged", get(search_categories_paged))
        .route("/search/slice", get(search_categories_slice))
        .route("/filter", post(filter_categories))
        .route("/filter/slice", post(filter_categories_slice))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(shared_service)
}

/// List all categories ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All categories", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<Vec<Category>>> {
    Ok(Json(service.list_categories().await?))
}

/// One page of categories with totals
#[utoipa::path(
    get,
    path = "/paged",
    tag = TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of categories", body = Page<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories_paged<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> CategoryResult<Json<Page<Category>>> {
    Ok(Json(service.list_categories_paged(params).await?))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    IdPath(id): IdPath,
) -> CategoryResult<Json<Category>> {
    Ok(Json(service.get_category(id).await?))
}

/// Update the supplied fields of a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<Category>> {
    Ok(Json(service.update_category(id, input).await?))
}

/// Delete a category; its products keep existing without a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    IdPath(id): IdPath,
) -> CategoryResult<impl IntoResponse> {
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Categories whose name contains `name`, ignoring case
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(NameQuery),
    responses(
        (status = 200, description = "Matching categories", body = Vec<Category>),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedQuery(query): ValidatedQuery<NameQuery>,
) -> CategoryResult<Json<Vec<Category>>> {
    Ok(Json(service.search_by_name(&query.name).await?))
}

#[utoipa::path(
    get,
    path = "/search/paged",
    tag = TAG,
    params(NameQuery, PageParams),
    responses(
        (status = 200, description = "Page of matching categories", body = Page<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_categories_paged<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedQuery(query): ValidatedQuery<NameQuery>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> CategoryResult<Json<Page<Category>>> {
    Ok(Json(service.search_by_name_paged(&query.name, params).await?))
}

#[utoipa::path(
    get,
    path = "/search/slice",
    tag = TAG,
    params(NameQuery, PageParams),
    responses(
        (status = 200, description = "Slice of matching categories", body = Slice<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_categories_slice<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedQuery(query): ValidatedQuery<NameQuery>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> CategoryResult<Json<Slice<Category>>> {
    Ok(Json(service.search_by_name_slice(&query.name, params).await?))
}

/// Filter categories by any combination of criteria
#[utoipa::path(
    post,
    path = "/filter",
    tag = TAG,
    request_body = CategoryFilter,
    responses(
        (status = 200, description = "Page of matching categories", body = Page<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(filter): ValidatedJson<CategoryFilter>,
) -> CategoryResult<Json<Page<Category>>> {
    Ok(Json(service.filter_categories(filter).await?))
}

#[utoipa::path(
    post,
    path = "/filter/slice",
    tag = TAG,
    request_body = CategoryFilter,
    responses(
        (status = 200, description = "Slice of matching categories", body = Slice<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_categories_slice<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(filter): ValidatedJson<CategoryFilter>,
) -> CategoryResult<Json<Slice<Category>>> {
    Ok(Json(service.filter_categories_slice(filter).await?))
}
