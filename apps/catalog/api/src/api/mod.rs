//! API routes module

pub mod categories;
pub mod exports;
pub mod health;
pub mod products;

use axum::{Router, http::StatusCode, middleware, routing::get};
use observability::metrics_middleware;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix; `create_router` adds it.
///
/// Export routes are nested after the timeout layer so a long export is
/// never cut off.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/categories", categories::router(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.server.request_timeout,
        ))
        .nest("/products/export", exports::router(state))
        .route_layer(middleware::from_fn(metrics_middleware))
}

/// `/ready` (database ping) and `/metrics`, outside `/api`
pub fn operational_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
        .route("/metrics", get(observability::metrics_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, ExportConfig, ExternalApiConfig};
    use axum::body::Body;
    use axum::http::Request;
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> AppState {
        let config = Config {
            app: app_info!(),
            hostname: "test-host".to_string(),
            database: PostgresConfig::new("postgresql://localhost/catalog"),
            server: ServerConfig::default(),
            environment: Environment::Development,
            export: ExportConfig { chunk_size: 10 },
            external_api: ExternalApiConfig {
                base_url: "http://localhost:9".to_string(),
            },
            seed_data: false,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        AppState::new(config, db)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_export_jobs_route_is_not_shadowed_by_product_id() {
        let response = routes(&state())
            .oneshot(get("/products/export/jobs"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let jobs: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_blank_export_path_is_rejected_before_touching_the_database() {
        let request = Request::builder()
            .method("POST")
            .uri("/products/export/csv?filePath=")
            .body(Body::empty())
            .unwrap();

        let response = routes(&state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_ids_are_type_mismatch() {
        let app = routes(&state());

        for uri in ["/products/abc", "/categories/abc/products"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders_text() {
        observability::init_metrics();

        let response = operational_router(state())
            .oneshot(get("/metrics"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
