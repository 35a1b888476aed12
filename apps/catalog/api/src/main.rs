//! Catalog API - products, categories and exports over REST

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod seed;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(hostname = %config.hostname, "Starting {} v{}", config.app.name, config.app.version);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .wrap_err("Database migrations failed")?;

    let state = AppState::new(config, db);

    if state.config.seed_data {
        seed::seed_catalog(
            &api::categories::service(&state),
            &api::products::service(&state),
        )
        .await?;
    }

    observability::init_metrics();

    info!(
        base_url = state.external.base_url(),
        chunk_size = state.config.export.chunk_size,
        "External catalog client and export pipeline configured"
    );

    let cors = axum_helpers::cors_layer_from_env()?;
    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, cors);

    // /health, /ready and /metrics sit outside the API middleware stack
    let app = router
        .merge(health_router(state.config.app, state.config.hostname.clone()))
        .merge(api::operational_router(state.clone()));

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
