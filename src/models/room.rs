use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};

/// Room as reported by the platform management API.
///
/// 64-bit fields may arrive as JSON strings (protobuf JSON mapping) or as
/// plain numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRoom {
    pub name: String,
    #[serde(default, alias = "num_participants", deserialize_with = "wide_int")]
    pub num_participants: i64,
    #[serde(default, alias = "creation_time", deserialize_with = "wide_int")]
    pub creation_time: i64,
    #[serde(default)]
    pub metadata: String,
}

/// `ListRooms` response body
#[derive(Debug, Default, Deserialize)]
pub struct ListRoomsResponse {
    #[serde(default)]
    pub rooms: Vec<PlatformRoom>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WideInt {
    Number(i64),
    Text(String),
}

fn wide_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<WideInt>::deserialize(deserializer)? {
        None => Ok(0),
        Some(WideInt::Number(n)) => Ok(n),
        Some(WideInt::Text(s)) if s.is_empty() => Ok(0),
        Some(WideInt::Text(s)) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Room directory entry returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub name: String,
    pub num_participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl From<PlatformRoom> for RoomSummary {
    fn from(room: PlatformRoom) -> Self {
        let creation_time = (room.creation_time > 0)
            .then(|| DateTime::from_timestamp(room.creation_time, 0))
            .flatten()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true));

        Self {
            name: room.name,
            num_participants: u32::try_from(room.num_participants.max(0)).unwrap_or(u32::MAX),
            creation_time,
            metadata: Some(room.metadata).filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomsResponse {
    pub rooms: Vec<RoomSummary>,
}

/// Outcome of `DELETE /api/token`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DeleteRoomResponse {
    /// The platform does not report a disconnect count on direct delete, so
    /// `participantsDisconnected` is always `null` here.
    #[serde(rename_all = "camelCase")]
    Deleted {
        message: String,
        room: String,
        participants_disconnected: Option<u32>,
    },
    AlreadyGone { message: String, room: String },
}

impl DeleteRoomResponse {
    pub fn deleted(room: &str) -> Self {
        DeleteRoomResponse::Deleted {
            message: "Room deleted successfully".to_string(),
            room: room.to_string(),
            participants_disconnected: None,
        }
    }

    pub fn already_gone(room: &str) -> Self {
        DeleteRoomResponse::AlreadyGone {
            message: "Room not found or already deleted".to_string(),
            room: room.to_string(),
        }
    }
}

/// Client-side view of either delete outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRoomResult {
    pub message: String,
    pub room: String,
    #[serde(default)]
    pub participants_disconnected: Option<u32>,
}
