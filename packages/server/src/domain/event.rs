//! Inbound commands and outbound events of the real-time protocol.
//!
//! These are protocol-independent domain values. The WebSocket DTOs in
//! `infrastructure::dto::websocket` are converted to and from these types.

use super::{
    entity::{ChatMessage, UserIdentity},
    error::ValueObjectError,
    value_object::{ConnectionId, NodeId, RoomId, Timestamp},
};

/// Kind of an inbound event, known even when its payload is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    JoinRoom,
    LeaveRoom,
    SendMessage,
    Typing,
}

impl CommandKind {
    /// Name of the event on the wire (used in logs)
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::JoinRoom => "join_room",
            CommandKind::LeaveRoom => "leave_room",
            CommandKind::SendMessage => "send_message",
            CommandKind::Typing => "typing",
        }
    }
}

/// A well-formed inbound event whose payload failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct InvalidCommand {
    pub kind: CommandKind,
    #[source]
    pub reason: ValueObjectError,
}

impl InvalidCommand {
    pub fn new(kind: CommandKind, reason: ValueObjectError) -> Self {
        Self { kind, reason }
    }
}

/// Event sent by an authenticated connection.
///
/// `connect` and `disconnect` are transport-level and handled separately by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    JoinRoom { room_id: RoomId },
    LeaveRoom { room_id: RoomId },
    SendMessage { room_id: RoomId, content: String },
    Typing { room_id: RoomId, is_typing: bool },
}

impl ClientCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            ClientCommand::JoinRoom { .. } => CommandKind::JoinRoom,
            ClientCommand::LeaveRoom { .. } => CommandKind::LeaveRoom,
            ClientCommand::SendMessage { .. } => CommandKind::SendMessage,
            ClientCommand::Typing { .. } => CommandKind::Typing,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn room_id(&self) -> RoomId {
        match self {
            ClientCommand::JoinRoom { room_id }
            | ClientCommand::LeaveRoom { room_id }
            | ClientCommand::SendMessage { room_id, .. }
            | ClientCommand::Typing { room_id, .. } => *room_id,
        }
    }
}

/// A persisted message together with its author's display metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBroadcast {
    pub message: ChatMessage,
    pub author: UserIdentity,
}

/// Event delivered from the server to one or more connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    Connected {
        message: String,
    },
    RoomJoined {
        room_id: RoomId,
        room_name: String,
    },
    UserJoined {
        username: String,
        message: String,
        timestamp: Timestamp,
    },
    UserLeft {
        username: String,
        message: String,
        timestamp: Timestamp,
    },
    Message(MessageBroadcast),
    Typing {
        username: String,
        is_typing: bool,
    },
    Error {
        message: String,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::Connected { .. } => "connected",
            OutboundEvent::RoomJoined { .. } => "room_joined",
            OutboundEvent::UserJoined { .. } => "user_joined",
            OutboundEvent::UserLeft { .. } => "user_left",
            OutboundEvent::Message(_) => "message",
            OutboundEvent::Typing { .. } => "typing",
            OutboundEvent::Error { .. } => "error",
        }
    }

    pub fn welcome(user: &UserIdentity) -> Self {
        OutboundEvent::Connected {
            message: format!("Welcome, {}!", user.display_name),
        }
    }

    pub fn user_joined(username: &str, timestamp: Timestamp) -> Self {
        OutboundEvent::UserJoined {
            username: username.to_string(),
            message: format!("{username} joined the room"),
            timestamp,
        }
    }

    pub fn user_left(username: &str, timestamp: Timestamp) -> Self {
        OutboundEvent::UserLeft {
            username: username.to_string(),
            message: format!("{username} left the room"),
            timestamp,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        OutboundEvent::Error {
            message: message.into(),
        }
    }
}

/// A room-scoped event travelling over the fan-out transport.
///
/// Every process delivers it to its own local members of `room_id`,
/// except `exclude` (the sender of a typing signal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEnvelope {
    /// Process that published the envelope
    pub origin: NodeId,
    pub room_id: RoomId,
    pub exclude: Option<ConnectionId>,
    pub event: OutboundEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[test]
    fn test_notification_texts() {
        // テスト項目: 入退室・接続時の通知文言が組み立てられる
        // given (前提条件):
        let user = UserIdentity::new(UserId::new(1).unwrap(), "alice", "Alice A.");

        // when (操作):
        let welcome = OutboundEvent::welcome(&user);
        let joined = OutboundEvent::user_joined("alice", Timestamp::new(0));
        let left = OutboundEvent::user_left("alice", Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(
            welcome,
            OutboundEvent::Connected {
                message: "Welcome, Alice A.!".to_string()
            }
        );
        assert!(matches!(joined, OutboundEvent::UserJoined { ref message, .. } if message == "alice joined the room"));
        assert!(matches!(left, OutboundEvent::UserLeft { ref message, .. } if message == "alice left the room"));
    }

    #[test]
    fn test_command_room_id_and_name() {
        // テスト項目: コマンドから対象ルームとイベント名を取り出せる
        let room_id = RoomId::new(7).unwrap();
        let command = ClientCommand::SendMessage {
            room_id,
            content: "hi".to_string(),
        };

        assert_eq!(command.room_id(), room_id);
        assert_eq!(command.kind(), CommandKind::SendMessage);
        assert_eq!(command.name(), "send_message");
    }
}
