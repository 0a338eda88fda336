//! SIMPANSE Server - Asset Loan Request and Approval
//!
//! REST API server for borrowing shared assets.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simpanse_server::{
    api,
    config::AppConfig,
    repository::{Repository, SharedRepository},
    services::{self, persistence, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("simpanse_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting SIMPANSE Server v{}", env!("CARGO_PKG_VERSION"));

    // Open the snapshot store and restore the last saved state
    let store = persistence::open_store(&config.storage)
        .await
        .context("Failed to open snapshot store")?;

    let repository = SharedRepository::new(Repository::default());
    let services = Services::new(repository, store, &config);

    let seed = services::seed_repository().context("Failed to build seed data")?;
    let outcome = services.persistence.restore(seed).await;
    tracing::info!(source = ?outcome, "Application state ready");

    let flusher = services.persistence.spawn_flusher();

    // Save server address before moving config
    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Write whatever changed during the last debounce window
    flusher.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
