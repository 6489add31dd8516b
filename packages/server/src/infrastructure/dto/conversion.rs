//! Conversion logic between DTOs and domain values.

use crate::domain::{
    ChatMessage, ClientCommand, CommandKind, InvalidCommand, MessageBroadcast, OutboundEvent,
    PresenceRecord, RoomId,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientEvent> for ClientCommand {
    type Error = InvalidCommand;

    fn try_from(event: dto::ClientEvent) -> Result<Self, Self::Error> {
        Ok(match event {
            dto::ClientEvent::JoinRoom { room_id } => ClientCommand::JoinRoom {
                room_id: room_id_of(CommandKind::JoinRoom, room_id)?,
            },
            dto::ClientEvent::LeaveRoom { room_id } => ClientCommand::LeaveRoom {
                room_id: room_id_of(CommandKind::LeaveRoom, room_id)?,
            },
            dto::ClientEvent::SendMessage { room_id, content } => ClientCommand::SendMessage {
                room_id: room_id_of(CommandKind::SendMessage, room_id)?,
                content,
            },
            dto::ClientEvent::Typing { room_id, is_typing } => ClientCommand::Typing {
                room_id: room_id_of(CommandKind::Typing, room_id)?,
                is_typing,
            },
        })
    }
}

fn room_id_of(kind: CommandKind, room_id: i64) -> Result<RoomId, InvalidCommand> {
    RoomId::new(room_id).map_err(|reason| InvalidCommand::new(kind, reason))
}

// ========================================
// Domain → DTO
// ========================================

impl From<MessageBroadcast> for dto::MessagePayload {
    fn from(broadcast: MessageBroadcast) -> Self {
        let MessageBroadcast { message, author } = broadcast;
        Self {
            id: message.id.value(),
            content: message.content.into_string(),
            user_id: message.user_id.value(),
            username: author.username,
            display_name: author.display_name,
            room_id: message.room_id.value(),
            timestamp: message.timestamp.to_rfc3339(),
            message_type: message.message_type.to_string(),
            edited_at: message.edited_at.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<OutboundEvent> for dto::ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Connected { message } => dto::ServerEvent::Connected { message },
            OutboundEvent::RoomJoined { room_id, room_name } => dto::ServerEvent::RoomJoined {
                room_id: room_id.value(),
                room_name,
            },
            OutboundEvent::UserJoined {
                username,
                message,
                timestamp,
            } => dto::ServerEvent::UserJoined {
                username,
                message,
                timestamp: timestamp.to_rfc3339(),
            },
            OutboundEvent::UserLeft {
                username,
                message,
                timestamp,
            } => dto::ServerEvent::UserLeft {
                username,
                message,
                timestamp: timestamp.to_rfc3339(),
            },
            OutboundEvent::Message(broadcast) => dto::ServerEvent::Message(broadcast.into()),
            OutboundEvent::Typing {
                username,
                is_typing,
            } => dto::ServerEvent::Typing {
                username,
                is_typing,
            },
            OutboundEvent::Error { message } => dto::ServerEvent::Error { message },
        }
    }
}

impl From<ChatMessage> for http::MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.value(),
            content: message.content.into_string(),
            user_id: message.user_id.value(),
            room_id: message.room_id.value(),
            timestamp: message.timestamp.to_rfc3339(),
            message_type: message.message_type.to_string(),
            edited_at: message.edited_at.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<PresenceRecord> for http::PresenceDto {
    fn from(record: PresenceRecord) -> Self {
        Self {
            user_id: record.user_id.value(),
            is_online: record.is_online,
            last_seen: record.last_seen.map(|t| t.to_rfc3339()),
        }
    }
}

/// Serialize an outbound event into a text frame
pub fn encode_event(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerEvent::from(event.clone()))
}
