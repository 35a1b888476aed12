//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product and category management with filtered search, pagination and bulk export"
    ),
    components(
        schemas(axum_helpers::ProblemDetail)
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/categories", api = domain_categories::handlers::ApiDoc),
        (path = "/api/categories", api = domain_products::CategoryProductsApiDoc),
        (path = "/api/products/export", api = domain_exports::ApiDoc)
    )
)]
pub struct ApiDoc;
