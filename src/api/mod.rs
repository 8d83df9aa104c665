pub mod auth;
pub mod health;
pub mod pages;
pub mod token;

use std::time::Duration;

use axum::{http::StatusCode, middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::gate::require_session;
use crate::error::AppError;
use crate::state::AppState;

/// Create the application router: pages, API routes and the access gate.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(pages::page_routes())
        .merge(health::health_routes())
        .with_state(state)
        .layer(middleware::from_fn(require_session))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/token", token::token_routes())
}

fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    use axum::response::IntoResponse;

    tracing::error!("Handler panicked");
    AppError::internal("Internal server error").into_response()
}
