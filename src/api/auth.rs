use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::session::{check_password, session_cookie};
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// Auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/", post(login))
}

/// POST /api/auth - Exchange the application password for the session cookie
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let request: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "Auth API error");
        AppError::internal("Internal server error")
    })?;

    check_password(request.password(), state.config.app_password.as_deref())?;

    tracing::info!("Password accepted, issuing session cookie");

    Ok((
        jar.add(session_cookie(state.config.production)),
        Json(LoginResponse {
            success: true,
            message: "Authentication successful".to_string(),
        }),
    ))
}
