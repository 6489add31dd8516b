//! UseCase: 入力中通知
//!
//! 送信者以外のルームメンバーに `typing` を送ります。
//! 参加していないルームへの通知は黙って捨てます。

use std::sync::Arc;

use crate::domain::{ConnectionId, OutboundEvent, RoomId};

use super::{
    broadcast::RoomBroadcaster, error::ChatError, membership::RoomMembershipRegistry,
    session_store::SessionStore,
};

pub struct TypingUseCase {
    sessions: Arc<SessionStore>,
    registry: Arc<RoomMembershipRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl TypingUseCase {
    pub fn new(
        sessions: Arc<SessionStore>,
        registry: Arc<RoomMembershipRegistry>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            sessions,
            registry,
            broadcaster,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        is_typing: bool,
    ) -> Result<(), ChatError> {
        let session = self.sessions.lookup(connection_id).await?;
        if !self.registry.is_member(connection_id, room_id) {
            tracing::debug!(
                "Dropping typing from '{}' for room {}: not a member",
                session.username(),
                room_id
            );
            return Ok(());
        }

        self.broadcaster
            .to_room(
                room_id,
                OutboundEvent::Typing {
                    username: session.user.username.clone(),
                    is_typing,
                },
                Some(connection_id.clone()),
            )
            .await;
        Ok(())
    }
}
