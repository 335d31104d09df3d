use anyhow::{Context, Result};
use dotenv::dotenv;
use marketplace::handler::AppRouter;
use shared::{
    config::{Config, ConnectionManager},
    state::AppState,
    utils::{Telemetry, init_logger},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = config
        .otel_endpoint
        .as_ref()
        .map(|endpoint| Telemetry::new("marketplace", endpoint.clone()));

    let logger_provider = match telemetry.as_mut() {
        Some(telemetry) => Some(telemetry.init().context("Failed to initialize telemetry")?),
        None => None,
    };

    init_logger(logger_provider.as_ref(), "marketplace", is_dev, is_enable_file);

    let pool = ConnectionManager::new_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        ConnectionManager::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let state = AppState::new(pool, &config)
        .await
        .context("Failed to create AppState")?;

    info!("🚀 Server started successfully");

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("Shutting down servers...");

    if let Some(telemetry) = telemetry {
        telemetry.shutdown()?;
    }

    Ok(())
}
