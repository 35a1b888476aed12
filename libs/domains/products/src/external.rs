//! Client for the upstream catalog API.
//!
//! Every request forwards the correlation id of the request being served, so
//! upstream logs can be joined with ours.

use axum_helpers::{CORRELATION_ID_HEADER, current_correlation_id};
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

#[derive(Debug, Error)]
pub enum ExternalApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("External API returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ExternalApiResult<T> = Result<T, ExternalApiError>;

/// Product as exchanged with the upstream API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct ExternalCatalogClient {
    client: Client,
    base_url: String,
}

impl Default for ExternalCatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ExternalCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_product(&self, id: i64) -> ExternalApiResult<ExternalProduct> {
        info!(product_id = id, "Fetching external product");
        let request = self
            .client
            .get(format!("{}/products/{}", self.base_url, id));
        self.send(request).await
    }

    pub async fn search_products(&self, query: &str) -> ExternalApiResult<Vec<ExternalProduct>> {
        info!(query, "Searching external products");
        let request = self
            .client
            .get(format!("{}/products/search", self.base_url))
            .query(&[("q", query)]);
        self.send(request).await
    }

    pub async fn create_product(
        &self,
        product: &ExternalProduct,
    ) -> ExternalApiResult<ExternalProduct> {
        info!(name = %product.name, "Creating external product");
        let request = self
            .client
            .post(format!("{}/products", self.base_url))
            .json(product);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ExternalApiResult<T> {
        let request = match current_correlation_id() {
            Some(id) => request.header(CORRELATION_ID_HEADER, id),
            None => request,
        };

        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> ExternalApiResult<Response> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), %body, "External API error");
        return Err(ExternalApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::get,
    };
    use axum_helpers::with_correlation_id;
    use std::collections::HashMap;

    async fn upstream() -> String {
        let app = Router::new()
            .route(
                "/products/search",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    Json(vec![ExternalProduct {
                        id: Some(1),
                        name: q.get("q").cloned().unwrap_or_default(),
                        description: None,
                        price: Decimal::new(500, 2),
                    }])
                }),
            )
            .route(
                "/products/{id}",
                get(|Path(id): Path<i64>, headers: HeaderMap| async move {
                    if id == 404 {
                        return Err((StatusCode::NOT_FOUND, "no such product"));
                    }
                    let correlation = headers
                        .get("x-correlation-id")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    Ok(Json(ExternalProduct {
                        id: Some(id),
                        name: "Upstream".into(),
                        description: correlation,
                        price: Decimal::ONE,
                    }))
                }),
            )
            .route(
                "/products",
                axum::routing::post(|Json(mut product): Json<ExternalProduct>| async move {
                    product.id = Some(77);
                    (StatusCode::CREATED, Json(product))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_forwards_correlation_id() {
        let client = ExternalCatalogClient::new(upstream().await);

        let product = with_correlation_id("abc-123".into(), client.get_product(5))
            .await
            .unwrap();

        assert_eq!(product.id, Some(5));
        assert_eq!(product.description.as_deref(), Some("abc-123"));
    }

    #[tokio::test]
    async fn test_client_error_becomes_status_error() {
        let client = ExternalCatalogClient::new(upstream().await);

        match client.get_product(404).await {
            Err(ExternalApiError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such product");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_and_create() {
        let client = ExternalCatalogClient::new(upstream().await);

        let found = client.search_products("lamp").await.unwrap();
        assert_eq!(found[0].name, "lamp");

        let created = client
            .create_product(&ExternalProduct {
                id: None,
                name: "Desk".into(),
                description: None,
                price: Decimal::new(12000, 2),
            })
            .await
            .unwrap();
        assert_eq!(created.id, Some(77));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        assert_eq!(
            ExternalCatalogClient::new("http://upstream/").base_url(),
            "http://upstream"
        );
        assert_eq!(ExternalCatalogClient::default().base_url(), DEFAULT_BASE_URL);
    }
}
