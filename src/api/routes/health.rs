//! Health check and banner endpoints

use crate::api::types::{HealthResponse, RootResponse};
use axum::Json;

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Polarization monitoring API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health
///
/// Returns a simple health check response
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
