// =============================================================================
// Fazenda API - Health Endpoints
// =============================================================================

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// API root.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Bem-vindo à Fazenda Geo API",
        "health": "/health",
    }))
}

/// Liveness: the process is up and serving.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "API está funcionando corretamente",
    })
}

/// Readiness: the database answers.
pub async fn readiness(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.repo.ping().await.map_err(|e| {
        tracing::warn!("Readiness check failed: {}", e);
        ApiError::Unavailable("Banco de dados indisponível".into())
    })?;

    Ok(Json(HealthResponse {
        status: "ready",
        message: "Banco de dados acessível",
    }))
}
