//! Observability utilities for the catalog service.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Export job metrics (records read, written, skipped; job outcomes)
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, ExportMetrics};
//!
//! init_metrics();
//!
//! ExportMetrics::record_job_started("csv");
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod export;
pub mod middleware;

pub use export::ExportMetrics;
pub use middleware::metrics_middleware;

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at startup. If a global recorder is already installed (another
/// test in the same process, for instance) the returned handle renders an
/// empty registry instead of failing startup.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        match metrics::set_global_recorder(recorder) {
            Ok(()) => info!("Prometheus metrics recorder initialized"),
            Err(_) => warn!("Metrics recorder already installed, keeping the existing one"),
        }

        register_metric_descriptions();
        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Export metrics
    describe_counter!("export_jobs_total", "Export jobs by format and status");
    describe_histogram!(
        "export_job_duration_seconds",
        "Export job duration in seconds"
    );
    describe_counter!(
        "export_items_total",
        "Items handled by export steps, by phase (read, written, skipped)"
    );
    describe_gauge!("export_jobs_running", "Export jobs currently running");
}
