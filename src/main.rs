// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::backend_repository::BackendRepository;
use crate::infrastructure::config::{load_backend_config, load_charts_config};
use crate::presentation::app_state::AppState;
use crate::presentation::router::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let backend_config = load_backend_config().context("Failed to load config/backend")?;
    let charts_config = load_charts_config().context("Failed to load config/charts")?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(BackendRepository::new(backend_config.backend.clone())?);

    // Create services (application layer)
    let chart_service = ChartService::new(
        repository.clone(),
        charts_config.default_series,
        charts_config.cache_slots,
    );
    let dashboard_service = DashboardService::new(repository);

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        dashboard_service,
        default_year: charts_config.default_year,
    });

    // Build router (presentation layer)
    let app = router(state);

    // Start server
    let addr: SocketAddr = backend_config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", backend_config.server.bind_addr))?;
    tracing::info!(
        "Starting royalty-charts service on {} (backend {})",
        addr,
        backend_config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
