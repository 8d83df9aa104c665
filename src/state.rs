use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::error::AppError;
use crate::platform::RoomService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when the platform credentials are not configured.
    pub issuer: Option<Arc<TokenIssuer>>,
    pub room_service: Option<Arc<dyn RoomService>>,
}

impl AppState {
    pub fn new(
        config: Config,
        issuer: Option<TokenIssuer>,
        room_service: Option<Arc<dyn RoomService>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            issuer: issuer.map(Arc::new),
            room_service,
        }
    }

    pub fn issuer(&self) -> Result<&TokenIssuer, AppError> {
        self.issuer
            .as_deref()
            .ok_or_else(|| AppError::InternalConfig("Server misconfigured".to_string()))
    }

    pub fn room_service(&self) -> Option<&dyn RoomService> {
        self.room_service.as_deref()
    }
}
