// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::{ChartService, ChartSettings};
use crate::infrastructure::config::load_config;
use crate::infrastructure::http_client::HttpDashboardApi;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;

    // Create API client (infrastructure layer)
    let api = Arc::new(HttpDashboardApi::new(&config.api)?);

    // Create services (application layer)
    let chart_service = ChartService::new(
        api,
        ChartSettings {
            min_bar_fraction: config.chart.min_bar_fraction,
        },
    );

    // Create application state
    let state = Arc::new(AppState { chart_service });

    // Build router (presentation layer)
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting broilink-dashboard on {} (backend {})",
        addr,
        config.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
