//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roomgate::auth::TokenIssuer;
use roomgate::config::Config;
use roomgate::models::PlatformRoom;
use roomgate::platform::{PlatformError, RoomService};
use roomgate::state::AppState;

pub const PASSWORD: &str = "secret";

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        production: false,
        app_password: Some(PASSWORD.to_string()),
        platform_api_key: Some("APItestkey".to_string()),
        platform_api_secret: Some("integration-test-signing-secret".to_string()),
        platform_url: Some("wss://rooms.example.test".to_string()),
        public_platform_url: None,
        platform_timeout_seconds: 5,
        json_logs: false,
    }
}

/// In-memory stand-in for the platform management API.
#[derive(Default)]
pub struct FakeRoomService {
    rooms: Mutex<Vec<PlatformRoom>>,
    failure: Mutex<Option<PlatformError>>,
}

impl FakeRoomService {
    pub fn with_rooms(rooms: Vec<PlatformRoom>) -> Self {
        Self {
            rooms: Mutex::new(rooms),
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `err`.
    pub fn fail_with(&self, err: PlatformError) {
        *self.failure.lock().expect("lock") = Some(err);
    }

    pub fn room_names(&self) -> Vec<String> {
        self.rooms
            .lock()
            .expect("lock")
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    fn check_failure(&self) -> Result<(), PlatformError> {
        match self.failure.lock().expect("lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RoomService for FakeRoomService {
    async fn list_rooms(&self) -> Result<Vec<PlatformRoom>, PlatformError> {
        self.check_failure()?;
        Ok(self.rooms.lock().expect("lock").clone())
    }

    async fn delete_room(&self, room: &str) -> Result<(), PlatformError> {
        self.check_failure()?;
        let mut rooms = self.rooms.lock().expect("lock");
        let before = rooms.len();
        rooms.retain(|r| r.name != room);
        if rooms.len() == before {
            return Err(PlatformError {
                status: Some(404),
                code: Some("not_found".to_string()),
                message: "requested room does not exist".to_string(),
            });
        }
        Ok(())
    }
}

pub fn room(name: &str, participants: i64, created: i64) -> PlatformRoom {
    PlatformRoom {
        name: name.to_string(),
        num_participants: participants,
        creation_time: created,
        metadata: String::new(),
    }
}

pub fn app_state(config: Config, service: Arc<FakeRoomService>) -> AppState {
    let issuer = config.platform().map(|p| TokenIssuer::new(&p));
    let service: Arc<dyn RoomService> = service;
    AppState::new(config, issuer, Some(service))
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(&test_config().platform().expect("platform configured"))
}
