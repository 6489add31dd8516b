//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Response body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub service: String,
}

/// Response body of `GET /api/users/{user_id}/presence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceDto {
    pub user_id: i64,
    pub is_online: bool,
    pub last_seen: Option<String>,
}

/// Query of `GET /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<usize>,
}

/// One entry of a room's message history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub room_id: i64,
    pub timestamp: String,
    pub message_type: String,
    pub edited_at: Option<String>,
}

/// Error body returned alongside non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
