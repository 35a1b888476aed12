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
use domain_categories::CategoryRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CategoryProductsQuery, CreateProduct, NameQuery, PriceQuery, Product, ProductFilter,
    ProductWithCategory, TermQuery, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "products";
pub const CATEGORY_PRODUCTS_TAG: &str = "category-products";

type SharedService<R, C> = State<Arc<ProductService<R, C>>>;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        list_products_paged,
        create_product,
        get_product,
        update_product,
        delete_product,
        search_products,
        search_products_paged,
        search_products_slice,
        under_price,
        under_price_paged,
        under_price_slice,
        in_stock,
        in_stock_paged,
        in_stock_slice,
        filter_products,
        filter_products_slice,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductFilter, Page<Product>, Slice<Product>),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestTypeMismatchResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the `/categories/{id}/products` routes
#[derive(OpenApi)]
#[openapi(
    paths(
        category_products,
        category_products_slice,
        category_products_page,
        category_products_filtered,
        category_products_search,
        category_products_by_stock_status,
        category_products_with_category,
    ),
    components(schemas(Product, ProductWithCategory, Page<Product>, Slice<Product>)),
    tags(
        (name = CATEGORY_PRODUCTS_TAG, description = "Products scoped to one category")
    )
)]
pub struct CategoryProductsApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R, C>(service: ProductService<R, C>) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/paged", get(list_products_paged))
        .route("/search", get(search_products))
        .route("/search/paged", get(search_products_paged))
        .route("/search/slice", get(search_products_slice))
        .route("/under-price", get(under_price))
        .route("/under-price/paged", get(under_price_paged))
        .route("/under-price/slice", get(under_price_slice))
        .route("/in-stock", get(in_stock))
        .route("/in-stock/paged", get(in_stock_paged))
        .route("/in-stock/slice", get(in_stock_slice))
        .route("/filter", post(filter_products))
        .route("/filter/slice", post(filter_products_slice))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// Routes served under `/categories`, to be merged with the category router
pub fn category_products_router<R, C>(service: ProductService<R, C>) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/{id}/products", get(category_products))
        .route("/{id}/products/paged", get(category_products_slice))
        .route("/{id}/products/counted", get(category_products_page))
        .route("/{id}/products/filter", get(category_products_filtered))
        .route("/{id}/products/search", get(category_products_search))
        .route(
            "/{id}/products/by-stock-status",
            get(category_products_by_stock_status),
        )
        .route(
            "/{id}/products/with-category",
            get(category_products_with_category),
        )
        .with_state(shared_service)
}

/// List all products ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.list_products().await?))
}

#[utoipa::path(
    get,
    path = "/paged",
    tag = TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products_paged<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Page<Product>>> {
    Ok(Json(service.list_products_paged(params).await?))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.get_product(id).await?))
}

/// Update the supplied fields of a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.update_product(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Products whose name contains `name`, ignoring case
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(NameQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(query): ValidatedQuery<NameQuery>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.search_by_name(&query.name).await?))
}

#[utoipa::path(
    get,
    path = "/search/paged",
    tag = TAG,
    params(NameQuery, PageParams),
    responses(
        (status = 200, description = "Page of matching products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products_paged<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(query): ValidatedQuery<NameQuery>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Page<Product>>> {
    Ok(Json(service.search_by_name_paged(&query.name, params).await?))
}

#[utoipa::path(
    get,
    path = "/search/slice",
    tag = TAG,
    params(NameQuery, PageParams),
    responses(
        (status = 200, description = "Slice of matching products", body = Slice<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products_slice<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(query): ValidatedQuery<NameQuery>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Slice<Product>>> {
    Ok(Json(service.search_by_name_slice(&query.name, params).await?))
}

/// Products strictly cheaper than `price`
#[utoipa::path(
    get,
    path = "/under-price",
    tag = TAG,
    params(PriceQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestTypeMismatchResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn under_price<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(query): ValidatedQuery<PriceQuery>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.under_price(query.price).await?))
}

/// Sorted by price unless `sort` says otherwise
#[utoipa::path(
    get,
    path = "/under-price/paged",
    tag = TAG,
    params(PriceQuery, PageParams),
    responses(
        (status = 200, description = "Page of matching products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn under_price_paged<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(query): ValidatedQuery<PriceQuery>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Page<Product>>> {
    Ok(Json(service.under_price_paged(query.price, params).await?))
}

#[utoipa::path(
    get,
    path = "/under-price/slice",
    tag = TAG,
    params(PriceQuery, PageParams),
    responses(
        (status = 200, description = "Slice of matching products", body = Slice<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn under_price_slice<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(query): ValidatedQuery<PriceQuery>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Slice<Product>>> {
    Ok(Json(service.under_price_slice(query.price, params).await?))
}

#[utoipa::path(
    get,
    path = "/in-stock",
    tag = TAG,
    responses(
        (status = 200, description = "Products in stock", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn in_stock<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.in_stock().await?))
}

#[utoipa::path(
    get,
    path = "/in-stock/paged",
    tag = TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of products in stock", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn in_stock_paged<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Page<Product>>> {
    Ok(Json(service.in_stock_paged(params).await?))
}

#[utoipa::path(
    get,
    path = "/in-stock/slice",
    tag = TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Slice of products in stock", body = Slice<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn in_stock_slice<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Slice<Product>>> {
    Ok(Json(service.in_stock_slice(params).await?))
}

/// Filter products; at least one of name, price bounds, category or
/// description is required
#[utoipa::path(
    post,
    path = "/filter",
    tag = TAG,
    request_body = ProductFilter,
    responses(
        (status = 200, description = "Page of matching products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_products<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedJson(filter): ValidatedJson<ProductFilter>,
) -> ProductResult<Json<Page<Product>>> {
    Ok(Json(service.filter_products(filter).await?))
}

#[utoipa::path(
    post,
    path = "/filter/slice",
    tag = TAG,
    request_body = ProductFilter,
    responses(
        (status = 200, description = "Slice of matching products", body = Slice<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_products_slice<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ValidatedJson(filter): ValidatedJson<ProductFilter>,
) -> ProductResult<Json<Slice<Product>>> {
    Ok(Json(service.filter_products_slice(filter).await?))
}

/// All products of a category ordered by id
#[utoipa::path(
    get,
    path = "/{id}/products",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products of the category", body = Vec<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.products_by_category(id).await?))
}

/// Uncounted slice of a category's products
#[utoipa::path(
    get,
    path = "/{id}/products/paged",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Slice of products", body = Slice<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products_slice<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Slice<Product>>> {
    Ok(Json(service.products_by_category_slice(id, params).await?))
}

/// Counted page of a category's products
#[utoipa::path(
    get,
    path = "/{id}/products/counted",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Page of products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products_page<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> ProductResult<Json<Page<Product>>> {
    Ok(Json(service.products_by_category_page(id, params).await?))
}

#[utoipa::path(
    get,
    path = "/{id}/products/filter",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID"),
        CategoryProductsQuery
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products_filtered<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
    ValidatedQuery(query): ValidatedQuery<CategoryProductsQuery>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.products_by_category_filtered(id, query).await?))
}

/// Name or description search within a category
#[utoipa::path(
    get,
    path = "/{id}/products/search",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID"),
        TermQuery
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products_search<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
    ValidatedQuery(query): ValidatedQuery<TermQuery>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.category_text_search(id, &query.term).await?))
}

/// In-stock products first
#[utoipa::path(
    get,
    path = "/{id}/products/by-stock-status",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products ordered by stock status", body = Vec<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products_by_stock_status<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.products_by_stock_status(id).await?))
}

/// Products with their category loaded in the same query
#[utoipa::path(
    get,
    path = "/{id}/products/with-category",
    tag = CATEGORY_PRODUCTS_TAG,
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products with category", body = Vec<ProductWithCategory>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_products_with_category<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Vec<ProductWithCategory>>> {
    Ok(Json(service.products_with_category(id).await?))
}
