use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue},
    routing::get,
    Json, Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::{AppError, Result};
use crate::models::{DeleteRoomResponse, RoomSummary, RoomsResponse, TokenQuery, TokenResponse};
use crate::platform::is_not_found;
use crate::state::AppState;

const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";
const PLATFORM_MISSING: &str = "Platform configuration missing";

/// Token and room management routes. Nothing here may be cached.
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(issue_token).post(list_rooms).delete(delete_room))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(NO_STORE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
}

fn missing_param(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing \"{}\" query parameter", name))
}

type RawPairs = std::result::Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Decode the query string. Repeated keys keep their first value and an
/// undecodable string is a JSON 400 rather than axum's plain-text rejection.
fn token_query(pairs: RawPairs) -> Result<TokenQuery> {
    let Query(pairs) = pairs.map_err(|e| {
        tracing::warn!(error = %e, "Rejected query string");
        AppError::BadRequest("Invalid query string".to_string())
    })?;
    Ok(TokenQuery::from_pairs(pairs))
}

/// GET /api/token?room=&username= - Mint a participant token
async fn issue_token(
    State(state): State<AppState>,
    pairs: RawPairs,
) -> Result<Json<TokenResponse>> {
    let query = token_query(pairs)?;
    let room = query.room().ok_or_else(|| missing_param("room"))?;
    let username = query.username().ok_or_else(|| missing_param("username"))?;

    let token = state
        .issuer()?
        .participant_token(username, room)
        .map_err(|e| {
            tracing::error!(error = %e, room = %room, "Error generating token");
            AppError::internal("Failed to generate token")
        })?;

    tracing::info!(room = %room, user = %username, "Token generated");

    Ok(Json(TokenResponse { token }))
}

/// POST /api/token - List active rooms
async fn list_rooms(State(state): State<AppState>) -> Result<Json<RoomsResponse>> {
    let failed = |details: String| {
        tracing::error!(error = %details, "Error listing rooms");
        AppError::internal_with_details("Failed to list rooms", details).timestamped()
    };

    let service = state
        .room_service()
        .ok_or_else(|| failed(PLATFORM_MISSING.to_string()))?;
    let rooms = service.list_rooms().await.map_err(|e| failed(e.to_string()))?;

    tracing::info!(count = rooms.len(), "Found active rooms");

    Ok(Json(RoomsResponse {
        rooms: rooms.into_iter().map(RoomSummary::from).collect(),
    }))
}

/// DELETE /api/token?room= - Delete a room, disconnecting everyone in it
async fn delete_room(
    State(state): State<AppState>,
    pairs: RawPairs,
) -> Result<Json<DeleteRoomResponse>> {
    let query = token_query(pairs)?;
    let room = query.room().ok_or_else(|| missing_param("room"))?;

    tracing::info!(room = %room, user = ?query.username(), "Room deletion requested");

    let service = state.room_service().ok_or_else(|| {
        tracing::error!(room = %room, "Error during room deletion: {}", PLATFORM_MISSING);
        AppError::internal_with_details("Failed to delete room", PLATFORM_MISSING)
    })?;

    match service.delete_room(room).await {
        Ok(()) => {
            tracing::info!(room = %room, "Room deleted");
            Ok(Json(DeleteRoomResponse::deleted(room)))
        }
        Err(e) if is_not_found(&e) => {
            tracing::info!(room = %room, "Room not found or already deleted");
            Ok(Json(DeleteRoomResponse::already_gone(room)))
        }
        Err(e) => {
            tracing::error!(room = %room, error = %e, "Error during room deletion");
            Err(AppError::internal_with_details(
                "Failed to delete room",
                e.to_string(),
            ))
        }
    }
}
