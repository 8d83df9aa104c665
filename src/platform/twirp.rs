use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{PlatformError, RoomService};
use crate::auth::TokenIssuer;
use crate::config::{Config, PlatformConfig};
use crate::models::{ListRoomsResponse, PlatformRoom, VideoGrant};

const ROOM_SERVICE_PATH: &str = "/twirp/livekit.RoomService";

/// `RoomService` over the platform's Twirp JSON endpoints.
#[derive(Clone)]
pub struct TwirpRoomService {
    client: Client,
    base_url: String,
    issuer: TokenIssuer,
}

/// Twirp error body
#[derive(Debug, Deserialize)]
struct TwirpError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Serialize)]
struct ListRoomsRequest {}

#[derive(Serialize)]
struct DeleteRoomRequest<'a> {
    room: &'a str,
}

impl TwirpRoomService {
    pub fn new(config: &Config, platform: &PlatformConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(config.platform_timeout())
            .build()
            .map_err(|e| PlatformError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, platform))
    }

    pub fn with_client(client: Client, platform: &PlatformConfig) -> Self {
        Self {
            client,
            base_url: platform.http_url(),
            issuer: TokenIssuer::new(platform),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<Req, Resp>(
        &self,
        method: &str,
        grant: VideoGrant,
        request: &Req,
    ) -> Result<Resp, PlatformError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let token = self
            .issuer
            .service_token(grant)
            .map_err(|e| PlatformError::transport(e.to_string()))?;

        let url = format!("{}{}/{}", self.base_url, ROOM_SERVICE_PATH, method);

        let res = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| PlatformError::transport(format!("{} request failed: {}", method, e)))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let parsed: Option<TwirpError> = serde_json::from_str(&body).ok();
            let (code, msg) = match parsed {
                Some(err) => (err.code, err.msg),
                None => (None, None),
            };

            return Err(PlatformError {
                status: Some(status.as_u16()),
                code,
                message: msg
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("{} returned {}: {}", method, status, body)),
            });
        }

        res.json::<Resp>()
            .await
            .map_err(|e| PlatformError::transport(format!("Invalid {} response: {}", method, e)))
    }
}

#[async_trait]
impl RoomService for TwirpRoomService {
    async fn list_rooms(&self) -> Result<Vec<PlatformRoom>, PlatformError> {
        let response: ListRoomsResponse = self
            .call("ListRooms", VideoGrant::list_rooms(), &ListRoomsRequest {})
            .await?;
        Ok(response.rooms)
    }

    async fn delete_room(&self, room: &str) -> Result<(), PlatformError> {
        let _: serde_json::Value = self
            .call(
                "DeleteRoom",
                VideoGrant::create_rooms(),
                &DeleteRoomRequest { room },
            )
            .await?;
        Ok(())
    }
}
