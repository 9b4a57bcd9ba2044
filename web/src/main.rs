//! Maker-checker HTTP server.
//!
//! Stores requests in PostgreSQL when `DATABASE_URL` is set, in memory
//! otherwise. See [`ServerConfig`] for the environment variables.

use anyhow::Context as _;
use maker_checker_core::stores::InMemoryRequestStore;
use maker_checker_postgres::PostgresRequestStore;
use maker_checker_web::{ServerConfig, server};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maker_checker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting maker-checker server");

    let config = ServerConfig::from_env().context("invalid configuration")?;
    info!(?config, "Configuration loaded");

    let metrics = match config.metrics_port {
        Some(_) => Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install Prometheus recorder")?,
        ),
        None => None,
    };

    if let Some(database_url) = config.database_url.clone() {
        info!("Connecting to PostgreSQL request store...");
        let store =
            PostgresRequestStore::connect(&database_url, config.database_max_connections).await?;
        store.migrate().await?;
        info!("PostgreSQL request store ready");

        server::run(config, store, metrics).await
    } else {
        warn!("DATABASE_URL not set, requests are kept in memory and lost on restart");
        server::run(config, InMemoryRequestStore::new(), metrics).await
    }
}
