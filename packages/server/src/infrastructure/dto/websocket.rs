//! WebSocket event DTOs.
//!
//! Every frame is a JSON object of the form `{"event": <name>, "data": {...}}`.

use serde::{Deserialize, Serialize};

/// Event sent from a client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinRoom { room_id: i64 },
    LeaveRoom { room_id: i64 },
    SendMessage { room_id: i64, content: String },
    Typing { room_id: i64, is_typing: bool },
}

/// Event sent from the server to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected {
        message: String,
    },
    RoomJoined {
        room_id: i64,
        room_name: String,
    },
    UserJoined {
        username: String,
        message: String,
        /// RFC 3339
        timestamp: String,
    },
    UserLeft {
        username: String,
        message: String,
        timestamp: String,
    },
    Message(MessagePayload),
    Typing {
        username: String,
        is_typing: bool,
    },
    Error {
        message: String,
    },
}

/// Fully populated chat message as broadcast to room members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub room_id: i64,
    pub timestamp: String,
    /// "text" | "image" | "file"
    pub message_type: String,
    pub edited_at: Option<String>,
}
