// =============================================================================
// Fazenda API - Server Entry Point
// =============================================================================
// Table of Contents:
// 1. Imports
// 2. Main Entry Point
// 3. Shutdown
// =============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use fazenda_api::config::Config;
use fazenda_api::db::Database;
use fazenda_api::repository::PgFazendaRepository;
use fazenda_api::{create_router, telemetry, AppState};

// -----------------------------------------------------------------------------
// 2. Main Entry Point
// -----------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from multiple possible locations
    // Try current directory first, then crates/api/
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_filename("crates/api/.env");
    }

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    telemetry::init(config.log_dir.as_deref())?;

    // Initialize database
    let db = Database::connect(&config).await?;

    // Create app state
    let state = AppState::new(Arc::new(PgFazendaRepository::new(&db)));

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Fazenda Geo API running on http://{}", config.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db.pool().close().await;
    tracing::info!("Server stopped");
    Ok(())
}

// -----------------------------------------------------------------------------
// 3. Shutdown
// -----------------------------------------------------------------------------

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
