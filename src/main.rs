//! contest-search: entry point for the greeting service and search gateway

use anyhow::Result;
use contest_search::{
    cluster, config,
    gateway::SearchGateway,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting contest-search v{}", contest_search::VERSION);

    // Load configuration
    let settings = config::load()?;

    // Connect to the search cluster
    let gateway = if settings.elasticsearch.hosts.is_empty() {
        warn!("No search cluster hosts configured, gateway disabled");
        None
    } else {
        Some(SearchGateway::new(settings.elasticsearch.clone())?)
    };

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    let state = AppState::new(settings, gateway);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cluster::teardown();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
