use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub password_configured: bool,
    pub platform_configured: bool,
    pub timestamp: String,
}

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health - Report whether the deployment is fully configured
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let password_configured = state.config.app_password.is_some();
    let platform_configured = state.issuer.is_some() && state.room_service.is_some();

    let status = if password_configured && platform_configured {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        password_configured,
        platform_configured,
        timestamp: Utc::now().to_rfc3339(),
    })
}
