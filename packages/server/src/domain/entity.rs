//! Core domain models for the chat service.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserId},
};

/// Authenticated identity resolved from a credential token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
}

impl UserIdentity {
    pub fn new(id: UserId, username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
        }
    }
}

/// Binding of one live connection to an authenticated identity.
///
/// Exists if and only if the connection is live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSession {
    pub connection_id: ConnectionId,
    pub user: UserIdentity,
    /// Timestamp when the connection was authenticated
    pub connected_at: Timestamp,
}

impl ConnectionSession {
    pub fn new(connection_id: ConnectionId, user: UserIdentity, connected_at: Timestamp) -> Self {
        Self {
            connection_id,
            user,
            connected_at,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

/// Durable chat room. Read-only from the real-time core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Globally unique room name
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

/// Kind of payload a message carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    File,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::File => "file",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(MessageType::Text),
            "image" => Ok(MessageType::Image),
            "file" => Ok(MessageType::File),
            other => Err(ValueObjectError::UnknownMessageType(other.to_string())),
        }
    }
}

/// A message that has been validated but not yet persisted.
///
/// Carries no id or timestamp: both are assigned by the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub content: MessageContent,
    pub message_type: MessageType,
}

/// Persisted chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub content: MessageContent,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub timestamp: Timestamp,
    pub message_type: MessageType,
    /// Never set by the real-time core; kept for forward compatibility
    pub edited_at: Option<Timestamp>,
}

/// Per-user presence, aggregated across all of the user's connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub user_id: UserId,
    pub is_online: bool,
    pub last_seen: Option<Timestamp>,
}

impl PresenceRecord {
    pub fn offline(user_id: UserId) -> Self {
        Self {
            user_id,
            is_online: false,
            last_seen: None,
        }
    }
}
