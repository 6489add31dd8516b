//! Room Membership Registry
//!
//! 揮発的なルーム参加状態と、永続側のルーム存在確認をまとめます。
//! ルームの存在確認（await を伴う）はレジストリを触る前に済ませます。

use std::sync::Arc;

use crate::domain::{ConnectionId, MembershipRepository, MessageRepository, Room, RoomId};

use super::error::ChatError;

pub struct RoomMembershipRegistry {
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl RoomMembershipRegistry {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            memberships,
            messages,
        }
    }

    /// Join an existing room.
    ///
    /// Returns the room and a snapshot of its members after the join.
    pub async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(Room, Vec<ConnectionId>), ChatError> {
        let room = self
            .messages
            .find_room(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;
        let members = self.memberships.join(connection_id, room_id);
        tracing::debug!(
            "Connection '{}' joined room {} ({} member(s))",
            connection_id,
            room_id,
            members.len()
        );
        Ok((room, members))
    }

    /// Idempotent; returns whether the connection was a member
    pub fn leave(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        self.memberships.leave(connection_id, room_id)
    }

    pub fn members_of(&self, room_id: RoomId) -> Vec<ConnectionId> {
        self.memberships.members_of(room_id)
    }

    pub fn is_member(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        self.memberships.is_member(connection_id, room_id)
    }

    pub fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        self.memberships.rooms_of(connection_id)
    }

    pub fn drop_connection(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        self.memberships.drop_connection(connection_id)
    }
}
