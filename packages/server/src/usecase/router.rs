//! Event Router
//!
//! 接続ごとのイベントを対応するユースケースへ振り分け、
//! 失敗を送信者宛ての `error` イベントに変換する境界です。
//! 1 つのイベントの失敗が他の接続やルームに影響することはありません。
//!
//! 同じ接続のイベントは UI 層が到着順に 1 つずつ `dispatch` し、
//! 異なる接続のイベントは並行に処理されます。

use std::{fmt, sync::Arc};

use crate::domain::{
    ClientCommand, CommandKind, ConnectionId, ConnectionSession, InvalidCommand, MessageType,
    OutboundEvent, PusherChannel, RoomId, ValueObjectError,
};

use super::{
    broadcast::RoomBroadcaster, connect::ConnectUseCase, disconnect::DisconnectUseCase,
    error::ChatError, join_room::JoinRoomUseCase, leave_room::LeaveRoomUseCase,
    send_message::SendMessageUseCase, typing::TypingUseCase,
};

pub struct EventRouter {
    connect: ConnectUseCase,
    disconnect: DisconnectUseCase,
    join_room: JoinRoomUseCase,
    leave_room: LeaveRoomUseCase,
    send_message: SendMessageUseCase,
    typing: TypingUseCase,
    broadcaster: Arc<RoomBroadcaster>,
}

impl EventRouter {
    pub fn new(
        connect: ConnectUseCase,
        disconnect: DisconnectUseCase,
        join_room: JoinRoomUseCase,
        leave_room: LeaveRoomUseCase,
        send_message: SendMessageUseCase,
        typing: TypingUseCase,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            connect,
            disconnect,
            join_room,
            leave_room,
            send_message,
            typing,
            broadcaster,
        }
    }

    /// Authenticate a new connection. `Unauthorized` ends the connection.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        token: Option<&str>,
        channel: PusherChannel,
    ) -> Result<ConnectionSession, ChatError> {
        self.connect.execute(connection_id, token, channel).await
    }

    /// Tear down a connection. Always succeeds.
    pub async fn disconnect(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        self.disconnect.execute(connection_id).await
    }

    /// Handle one inbound event of an authenticated connection
    pub async fn dispatch(&self, connection_id: &ConnectionId, command: ClientCommand) {
        let name = command.name();
        tracing::debug!("'{}' from connection '{}'", name, connection_id);

        let result = match command {
            ClientCommand::JoinRoom { room_id } => self
                .join_room
                .execute(connection_id, room_id)
                .await
                .map(|_| ()),
            ClientCommand::LeaveRoom { room_id } => {
                match self.leave_room.execute(connection_id, room_id).await {
                    Ok(_) | Err(ChatError::InvalidSession) => Ok(()),
                    Err(e) => Err(e),
                }
            }
            ClientCommand::SendMessage { room_id, content } => self
                .send_message
                .execute(connection_id, room_id, content, MessageType::Text)
                .await
                .map(|_| ()),
            ClientCommand::Typing { room_id, is_typing } => {
                if let Err(e) = self.typing.execute(connection_id, room_id, is_typing).await {
                    tracing::debug!("Typing from '{}' dropped: {}", connection_id, e);
                }
                Ok(())
            }
        };

        if let Err(error) = result {
            self.report(connection_id, name, error).await;
        }
    }

    /// Handle an event whose payload failed validation.
    ///
    /// A `join_room` for a room id that can never exist is reported as
    /// "Room not found", and a bad `typing` signal is dropped silently.
    pub async fn reject_command(&self, connection_id: &ConnectionId, invalid: InvalidCommand) {
        let InvalidCommand { kind, reason } = invalid;
        match (kind, reason) {
            (CommandKind::JoinRoom, ValueObjectError::RoomIdNotPositive(_)) => {
                self.report(connection_id, kind.name(), ChatError::RoomNotFound)
                    .await
            }
            (CommandKind::Typing, reason) => {
                tracing::debug!("Typing from '{}' dropped: {}", connection_id, reason)
            }
            (_, reason) => self.reject(connection_id, reason).await,
        }
    }

    /// Answer a frame that could not be decoded into a command
    pub async fn reject(&self, connection_id: &ConnectionId, reason: impl fmt::Display) {
        tracing::warn!("Rejected frame from '{}': {}", connection_id, reason);
        self.broadcaster
            .send_to(
                connection_id,
                &OutboundEvent::error(format!("Invalid event: {reason}")),
            )
            .await;
    }

    async fn report(&self, connection_id: &ConnectionId, event: &str, error: ChatError) {
        match &error {
            ChatError::Internal(detail) => tracing::error!(
                "'{}' from '{}' failed: {}",
                event,
                connection_id,
                detail
            ),
            other => tracing::warn!("'{}' from '{}' rejected: {}", event, connection_id, other),
        }
        self.broadcaster
            .send_to(connection_id, &OutboundEvent::error(error.to_string()))
            .await;
    }
}
