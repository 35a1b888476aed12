//! Application state management

use domain_exports::JobRegistry;
use domain_products::ExternalCatalogClient;
use std::sync::Arc;

/// Shared application state.
///
/// Cloned into every router; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Export executions for the lifetime of the process
    pub jobs: Arc<JobRegistry>,
    pub external: ExternalCatalogClient,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: database::postgres::DatabaseConnection) -> Self {
        let external = ExternalCatalogClient::new(config.external_api.base_url.clone());
        Self {
            config,
            db,
            jobs: Arc::new(JobRegistry::new()),
            external,
        }
    }
}
