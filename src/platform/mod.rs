pub mod twirp;

use async_trait::async_trait;

use crate::models::PlatformRoom;

pub use twirp::TwirpRoomService;

/// Failure reported by the platform management API.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PlatformError {
    /// HTTP status of the upstream response, if one was received.
    pub status: Option<u16>,
    /// Structured error code (`not_found`, `unauthenticated`, ...).
    pub code: Option<String>,
    pub message: String,
}

impl PlatformError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }
}

/// Decide whether an upstream failure means the room does not exist.
///
/// Structured signals are checked first; message inspection is the fallback.
pub fn is_not_found(err: &PlatformError) -> bool {
    if err.status == Some(404) {
        return true;
    }
    if err.code.as_deref() == Some("not_found") {
        return true;
    }
    err.message.contains("does not exist") || err.message.contains("not found")
}

/// Room management operations of the conferencing platform.
#[async_trait]
pub trait RoomService: Send + Sync {
    async fn list_rooms(&self) -> Result<Vec<PlatformRoom>, PlatformError>;

    async fn delete_room(&self, room: &str) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(status: Option<u16>, code: Option<&str>, message: &str) -> PlatformError {
        PlatformError {
            status,
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_not_found_by_status() {
        assert!(is_not_found(&err(Some(404), None, "gone")));
    }

    #[test]
    fn test_not_found_by_code() {
        assert!(is_not_found(&err(Some(400), Some("not_found"), "")));
    }

    #[test]
    fn test_not_found_by_message() {
        assert!(is_not_found(&err(None, None, "room does not exist")));
        assert!(is_not_found(&err(Some(500), None, "requested room not found")));
    }

    #[test]
    fn test_other_failures_are_not_not_found() {
        assert!(!is_not_found(&err(Some(500), Some("internal"), "database unavailable")));
        assert!(!is_not_found(&err(Some(401), Some("unauthenticated"), "invalid token")));
        assert!(!is_not_found(&PlatformError::transport("connection refused")));
    }

    #[test]
    fn test_message_match_is_case_sensitive() {
        assert!(!is_not_found(&err(Some(500), None, "Not Found handler crashed")));
        assert!(!is_not_found(&err(Some(500), None, "Room Does Not Exist")));
    }
}
