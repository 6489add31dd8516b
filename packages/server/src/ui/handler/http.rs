//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{PersistenceError, RoomId, UserId},
    infrastructure::dto::http::{ErrorDto, HealthDto, MessageDto, MessagesQuery, PresenceDto},
    ui::state::AppState,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 200;

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy".to_string(),
        service: "flashchat".to_string(),
    })
}

/// Most recent messages of a room, oldest first
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let room_id =
        RoomId::new(room_id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    match state.messages.list_messages(room_id, limit).await {
        Ok(messages) => Ok(Json(messages.into_iter().map(MessageDto::from).collect())),
        Err(PersistenceError::RoomNotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, "Room not found"))
        }
        Err(e) => {
            tracing::error!("Failed to list messages of room {}: {}", room_id, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ))
        }
    }
}

/// Online flag and last-seen time of a user
pub async fn get_user_presence(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<PresenceDto>, ApiError> {
    let user_id =
        UserId::new(user_id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    match state.presence.find(user_id).await {
        Ok(record) => Ok(Json(record.into())),
        Err(e) => {
            tracing::error!("Failed to read presence of user {}: {:?}", user_id, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ))
        }
    }
}
