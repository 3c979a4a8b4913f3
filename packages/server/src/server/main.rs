// Main entry point for the share-link resolution server

use anyhow::{Context, Result};
use server_core::{build_app, build_resolver, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,resolver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting share-link resolution service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(policy = ?config.policy, "Configuration loaded");

    // Discover the browser runtime once, up front
    let runtime = resolver::probe();

    // Build application
    let state = AppState::new(build_resolver(config.policy, runtime));
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
