//! Browser-side session lifecycle.
//!
//! `ConferenceSession` drives the conferencing page: it fetches tokens from
//! this service, hands them to the platform connection and keeps the room
//! directory. All state changes, whether caused by the user or by
//! notifications from the platform connection, go through
//! [`ConnectionState::next`].

pub mod http;

use async_trait::async_trait;

use crate::models::{DeleteRoomResult, RoomSummary};

pub use http::HttpApiClient;

/// Storage namespace used by the platform SDK.
pub const PLATFORM_NAMESPACE: &str = "livekit";
pub const SESSION_STORAGE_KEY: &str = "livekit-session";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ConnectRequested,
    ConnectSucceeded,
    ConnectFailed,
    DisconnectRequested,
    /// The platform connection reported it is connected.
    RemoteConnected,
    /// The platform connection dropped (server, network or local).
    RemoteDisconnected,
}

impl ConnectionState {
    /// Next state for `event`, or `None` when the event is dropped.
    pub fn next(self, event: SessionEvent) -> Option<ConnectionState> {
        use ConnectionState::*;
        use SessionEvent::*;

        match (self, event) {
            (Disconnected, ConnectRequested) => Some(Connecting),
            // Switching rooms means disconnecting first
            (Connecting | Connected, ConnectRequested) => None,
            (Connecting | Connected, ConnectSucceeded) => Some(Connected),
            (Connecting, ConnectFailed) => Some(Disconnected),
            (Disconnected, ConnectSucceeded | ConnectFailed) => None,
            (Connected, ConnectFailed) => None,
            (_, DisconnectRequested | RemoteDisconnected) => Some(Disconnected),
            (_, RemoteConnected) => Some(Connected),
        }
    }
}

/// Notifications emitted by the platform connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Connected,
    Disconnected,
}

/// This service's HTTP API as seen from the page.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_token(&self, room: &str, username: &str) -> Result<String, ClientError>;

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, ClientError>;

    async fn delete_room(
        &self,
        room: &str,
        username: Option<&str>,
    ) -> Result<DeleteRoomResult, ClientError>;
}

/// The platform SDK's room connection.
#[async_trait]
pub trait PlatformConnection: Send {
    async fn connect(&mut self, url: &str, token: &str) -> Result<(), ClientError>;

    async fn disconnect(&mut self) -> Result<(), ClientError>;
}

/// Browser storage and navigation.
pub trait ClientEnvironment {
    fn local_storage_keys(&self) -> Vec<String>;

    fn remove_local(&mut self, key: &str);

    fn clear_session_storage(&mut self);

    fn reload(&mut self);
}

/// Local storage keys wiped by "clear session".
pub fn is_session_key(key: &str) -> bool {
    key.contains(PLATFORM_NAMESPACE) || key.contains("room")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    /// A connect was already in flight.
    Dropped,
}

/// What "clear session" managed to do. There is no rollback.
#[derive(Debug, Default)]
pub struct ClearSessionReport {
    pub teardown: Option<DeleteRoomResult>,
    pub removed_keys: Vec<String>,
}

pub struct ConferenceSession<A, C, E> {
    api: A,
    connection: C,
    env: E,
    platform_url: String,
    state: ConnectionState,
    token: Option<String>,
    current_room: Option<String>,
    rooms: Vec<RoomSummary>,
}

impl<A, C, E> ConferenceSession<A, C, E>
where
    A: ApiClient,
    C: PlatformConnection,
    E: ClientEnvironment,
{
    pub fn new(api: A, connection: C, env: E, platform_url: impl Into<String>) -> Self {
        Self {
            api,
            connection,
            env,
            platform_url: platform_url.into(),
            state: ConnectionState::Disconnected,
            token: None,
            current_room: None,
            rooms: Vec::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Single entry point for state changes. Returns whether the event applied.
    fn apply(&mut self, event: SessionEvent) -> bool {
        let Some(next) = self.state.next(event) else {
            tracing::debug!(state = ?self.state, event = ?event, "Event dropped");
            return false;
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, event = ?event, "Session transition");
        }
        self.state = next;

        if next == ConnectionState::Disconnected {
            self.token = None;
            self.current_room = None;
        }
        true
    }

    /// Fetch a token and join `room` as `username`.
    pub async fn connect(&mut self, room: &str, username: &str) -> Result<ConnectOutcome, ClientError> {
        let (room, username) = (room.trim(), username.trim());
        if room.is_empty() || username.is_empty() {
            return Err(ClientError::InvalidInput(
                "Room name and username are required".to_string(),
            ));
        }

        if !self.apply(SessionEvent::ConnectRequested) {
            return Ok(ConnectOutcome::Dropped);
        }

        tracing::info!(room = %room, user = %username, "Getting token");

        let result = match self.api.fetch_token(room, username).await {
            Ok(token) => self
                .connection
                .connect(&self.platform_url, &token)
                .await
                .map(|()| token),
            Err(e) => Err(e),
        };

        match result {
            Ok(token) => {
                self.apply(SessionEvent::ConnectSucceeded);
                self.token = Some(token);
                self.current_room = Some(room.to_string());
                Ok(ConnectOutcome::Connected)
            }
            Err(e) => {
                tracing::error!(room = %room, error = %e, "Connection error");
                self.apply(SessionEvent::ConnectFailed);
                Err(e)
            }
        }
    }

    /// Leave the room. The local state becomes Disconnected even when the
    /// platform reports an error.
    pub async fn disconnect(&mut self) -> Result<(), ClientError> {
        let result = self.connection.disconnect().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Disconnect error");
        }
        self.apply(SessionEvent::DisconnectRequested);
        tracing::info!("Disconnected from room");
        result
    }

    /// Feed a notification from the platform connection.
    pub fn on_platform_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Connected => {
                self.apply(SessionEvent::RemoteConnected);
            }
            PlatformEvent::Disconnected => {
                tracing::info!("Room disconnected");
                self.apply(SessionEvent::RemoteDisconnected);
            }
        }
    }

    /// Disconnect, tear the room down server-side (best effort), wipe local
    /// session data and reload the page.
    pub async fn clear_session(&mut self, room: &str, username: &str) -> ClearSessionReport {
        let mut report = ClearSessionReport::default();

        if self.state == ConnectionState::Connected {
            // Already logged by disconnect()
            let _ = self.disconnect().await;
        }

        match self.api.delete_room(room, Some(username)).await {
            Ok(result) => {
                tracing::info!(room = %result.room, message = %result.message, "Server cleanup successful");
                if let Some(count) = result.participants_disconnected.filter(|n| *n > 0) {
                    tracing::info!(room = %result.room, count, "Disconnected participants");
                }
                report.teardown = Some(result);
            }
            Err(e) => tracing::error!(room = %room, error = %e, "Server cleanup failed"),
        }

        self.env.remove_local(SESSION_STORAGE_KEY);
        self.env.clear_session_storage();
        for key in self.env.local_storage_keys() {
            if is_session_key(&key) {
                self.env.remove_local(&key);
                report.removed_keys.push(key);
            }
        }

        self.env.reload();
        report
    }

    /// Refresh the active room list.
    pub async fn load_active_rooms(&mut self) -> Result<&[RoomSummary], ClientError> {
        tracing::debug!("Fetching active rooms");
        match self.api.list_rooms().await {
            Ok(rooms) => {
                tracing::info!(count = rooms.len(), "Loaded active rooms");
                self.rooms = rooms;
                Ok(&self.rooms)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load rooms");
                Err(e)
            }
        }
    }

    /// Delete a room, refresh the list and leave it if we are in it.
    pub async fn delete_room(&mut self, room: &str) -> Result<DeleteRoomResult, ClientError> {
        let result = self.api.delete_room(room, None).await.map_err(|e| {
            tracing::error!(room = %room, error = %e, "Failed to delete room");
            e
        })?;
        tracing::info!(room = %room, message = %result.message, "Room deleted");

        // Already logged by load_active_rooms()
        let _ = self.load_active_rooms().await;

        if self.state == ConnectionState::Connected && self.current_room.as_deref() == Some(room) {
            let _ = self.disconnect().await;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;
    use SessionEvent::*;

    #[test]
    fn test_connect_while_connecting_is_dropped() {
        assert_eq!(Disconnected.next(ConnectRequested), Some(Connecting));
        assert_eq!(Connecting.next(ConnectRequested), None);
    }

    #[test]
    fn test_connect_while_connected_is_dropped() {
        assert_eq!(Connected.next(ConnectRequested), None);
        assert_eq!(Connected.next(DisconnectRequested), Some(Disconnected));
        assert_eq!(Disconnected.next(ConnectRequested), Some(Connecting));
    }

    #[test]
    fn test_connecting_outcomes() {
        assert_eq!(Connecting.next(ConnectSucceeded), Some(Connected));
        assert_eq!(Connecting.next(ConnectFailed), Some(Disconnected));
        assert_eq!(Connecting.next(RemoteConnected), Some(Connected));
    }

    #[test]
    fn test_disconnects_from_any_state() {
        for state in [Disconnected, Connecting, Connected] {
            assert_eq!(state.next(DisconnectRequested), Some(Disconnected));
            assert_eq!(state.next(RemoteDisconnected), Some(Disconnected));
        }
    }

    #[test]
    fn test_stale_connect_results_are_ignored() {
        assert_eq!(Disconnected.next(ConnectSucceeded), None);
        assert_eq!(Disconnected.next(ConnectFailed), None);
        assert_eq!(Connected.next(ConnectFailed), None);
    }

    #[test]
    fn test_session_keys() {
        assert!(is_session_key("livekit-session"));
        assert!(is_session_key("lk-room-settings"));
        assert!(!is_session_key("theme"));
    }
}
