//! Access gate in front of every route.
//!
//! Exempt paths pass straight through. Everything else needs the session
//! marker cookie, otherwise the browser is redirected to the login page.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::session::{is_authenticated, SESSION_COOKIE};

pub const LOGIN_PATH: &str = "/login";

/// Built-in static asset prefixes.
const STATIC_PREFIXES: &[&str] = &["/static", "/favicon"];

/// Paths reachable without a session marker.
pub fn is_exempt_path(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || path.starts_with("/api/auth")
        || path == LOGIN_PATH
        || path == "/health"
        || path.contains('.')
}

/// Middleware: redirect unauthenticated requests for protected paths.
pub async fn require_session(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if is_exempt_path(path) {
        return next.run(request).await;
    }

    let cookie = jar.get(SESSION_COOKIE).map(|c| c.value());
    if !is_authenticated(cookie) {
        tracing::debug!(path = %path, "No session marker, redirecting to login");
        return Redirect::temporary(LOGIN_PATH).into_response();
    }

    next.run(request).await
}
