use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required input is missing.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The server itself is missing configuration. Not the caller's fault.
    #[error("Configuration error: {0}")]
    InternalConfig(String),

    /// Upstream or unexpected failure.
    #[error("Internal server error: {error}")]
    InternalError {
        error: String,
        details: Option<String>,
        timestamp: Option<DateTime<Utc>>,
    },
}

impl AppError {
    pub fn internal(error: impl Into<String>) -> Self {
        AppError::InternalError {
            error: error.into(),
            details: None,
            timestamp: None,
        }
    }

    pub fn internal_with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::InternalError {
            error: error.into(),
            details: Some(details.into()),
            timestamp: None,
        }
    }

    /// Stamp the error with the current time; the room directory reports it.
    pub fn timestamped(self) -> Self {
        match self {
            AppError::InternalError { error, details, .. } => AppError::InternalError {
                error,
                details,
                timestamp: Some(Utc::now()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalConfig(_) | AppError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error body. Optional fields are left out when unset.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::InternalConfig(msg) => ErrorBody {
                error: msg,
                details: None,
                timestamp: None,
            },
            AppError::InternalError {
                error,
                details,
                timestamp,
            } => ErrorBody {
                error,
                details,
                timestamp: timestamp.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::internal_with_details("Failed to generate token", err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
