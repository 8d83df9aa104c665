use serde::{Deserialize, Serialize};

/// Room permissions carried in the `video` claim of a platform token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_join: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_subscribe: Option<bool>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_list: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_create: bool,
}

impl VideoGrant {
    /// Join, publish and subscribe on exactly one room.
    pub fn participant(room: &str) -> Self {
        Self {
            room: Some(room.to_string()),
            room_join: true,
            can_publish: Some(true),
            can_subscribe: Some(true),
            ..Self::default()
        }
    }

    pub fn list_rooms() -> Self {
        Self {
            room_list: true,
            ..Self::default()
        }
    }

    pub fn create_rooms() -> Self {
        Self {
            room_create: true,
            ..Self::default()
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// JWT claims understood by the conferencing platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Platform API key
    pub iss: String,
    /// Participant identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrant,
}
