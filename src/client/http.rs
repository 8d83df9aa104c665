use async_trait::async_trait;
use axum_extra::extract::cookie::Cookie;
use reqwest::{header, redirect, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ApiClient, ClientError};
use crate::auth::session::SESSION_COOKIE;
use crate::models::{DeleteRoomResult, RoomSummary, RoomsResponse, TokenResponse};

/// `ApiClient` over HTTP, carrying the session marker cookie.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        // The access gate answers unauthenticated calls with a redirect to
        // the login page; surface that instead of following it.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie: None,
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.session_cookie.is_some()
    }

    /// `POST /api/auth` and keep the returned session marker.
    pub async fn login(&mut self, password: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/api/auth"))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await?;

        let response = check(response).await?;

        let marker = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse(v.to_string()).ok())
            .find(|c| c.name() == SESSION_COOKIE)
            .ok_or(ClientError::Unauthenticated)?;

        self.session_cookie = Some(format!("{}={}", marker.name(), marker.value()));
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.with_session(builder).send().await?;
        let response = check(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Map redirects and error statuses to `ClientError`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status.is_redirection() {
        return Err(ClientError::Unauthenticated);
    }
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "Unknown error".to_string());

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn fetch_token(&self, room: &str, username: &str) -> Result<String, ClientError> {
        let builder = self
            .client
            .get(self.url("/api/token"))
            .query(&[("room", room), ("username", username)]);

        let response: TokenResponse = self.send_json(builder).await?;
        Ok(response.token)
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, ClientError> {
        let builder = self.client.post(self.url("/api/token"));
        let response: RoomsResponse = self.send_json(builder).await?;
        Ok(response.rooms)
    }

    async fn delete_room(
        &self,
        room: &str,
        username: Option<&str>,
    ) -> Result<DeleteRoomResult, ClientError> {
        let mut builder = self
            .client
            .delete(self.url("/api/token"))
            .query(&[("room", room)]);
        if let Some(username) = username {
            builder = builder.query(&[("username", username)]);
        }

        self.send_json(builder).await
    }
}
