// =============================================================================
// Fazenda API - Library Root
// =============================================================================
// Table of Contents:
// 1. Modules
// 2. Application State
// 3. Router Setup
// =============================================================================

pub mod config;
pub mod db;
pub mod error;
pub mod fazendas;
pub mod geo;
pub mod health;
pub mod middleware;
pub mod pagination;
pub mod repository;
pub mod telemetry;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::repository::FazendaRepository;

// -----------------------------------------------------------------------------
// 2. Application State
// -----------------------------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn FazendaRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn FazendaRepository>) -> Self {
        Self { repo }
    }
}

// -----------------------------------------------------------------------------
// 3. Router Setup
// -----------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        // Health check
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        // Fazendas API
        .route("/fazendas/busca-ponto", post(fazendas::search_by_point))
        .route("/fazendas/busca-raio", post(fazendas::search_by_radius))
        .route("/fazendas/imovel/:cod_imovel", get(fazendas::get_by_cod_imovel))
        .route("/fazendas/:id", get(fazendas::get_fazenda))
        .route("/fazendas/:id/geojson", get(fazendas::get_fazenda_feature))
        // Middleware
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
