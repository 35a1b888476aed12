use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use core_config::AppInfo;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
    pub hostname: String,
}

#[derive(Clone)]
struct HealthState {
    app: AppInfo,
    hostname: String,
}

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs health checks concurrently and aggregates them into one JSON body.
///
/// Returns `503` if any check fails; the body lists every check as
/// `connected` or `disconnected`.
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> (StatusCode, Json<Value>) {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let results = join_all(checks.into_iter().map(|(_, check)| check)).await;

    let mut status_map = BTreeMap::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(_) => {
                status_map.insert(name.to_string(), json!("connected"));
            }
            Err(e) => {
                tracing::error!(check = name, "Readiness check failed: {}", e);
                status_map.insert(name.to_string(), json!("disconnected"));
                all_healthy = false;
            }
        }
    }

    status_map.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );
    let body = Json(Value::Object(status_map.into_iter().collect()));

    if all_healthy {
        (StatusCode::OK, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, body)
    }
}

async fn health_handler(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        name: state.app.name.to_string(),
        version: state.app.version.to_string(),
        hostname: state.hostname,
    })
}

/// Liveness router exposing `/health`.
///
/// Always 200 while the process is serving; readiness lives elsewhere.
pub fn health_router(app: AppInfo, hostname: impl Into<String>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(HealthState {
            app,
            hostname: hostname.into(),
        })
}
