//! Password check and the session marker cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::error::{AppError, Result};
use crate::models::SubmittedPassword;
use crate::security::secrets_match;

pub const SESSION_COOKIE: &str = "app-authenticated";
pub const SESSION_COOKIE_VALUE: &str = "true";
pub const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Check a submitted password against the configured one.
///
/// `configured` is `None` when the deployment has no password set.
pub fn check_password(submitted: SubmittedPassword<'_>, configured: Option<&str>) -> Result<()> {
    if submitted == SubmittedPassword::Missing {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let configured = configured.ok_or_else(|| {
        tracing::error!("APP_PASSWORD environment variable is not set");
        AppError::InternalConfig("Server configuration error".to_string())
    })?;

    match submitted {
        SubmittedPassword::Text(password) if secrets_match(password, configured) => Ok(()),
        _ => Err(AppError::Unauthorized("Invalid password".to_string())),
    }
}

/// Build the session marker cookie. `Secure` only in production.
pub fn session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, SESSION_COOKIE_VALUE))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
        .path("/")
        .build()
}

/// Whether a cookie value grants access.
pub fn is_authenticated(value: Option<&str>) -> bool {
    value == Some(SESSION_COOKIE_VALUE)
}
