//! UseCase: ルーム退出
//!
//! 退出は冪等です。実際に退出した場合だけ、残りのメンバーに `user_left` を送ります。

use std::sync::Arc;

use flashchat_shared::time::Clock;

use crate::domain::{ConnectionId, OutboundEvent, RoomId, Timestamp};

use super::{
    broadcast::RoomBroadcaster, error::ChatError, membership::RoomMembershipRegistry,
    session_store::SessionStore,
};

pub struct LeaveRoomUseCase {
    sessions: Arc<SessionStore>,
    registry: Arc<RoomMembershipRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    pub fn new(
        sessions: Arc<SessionStore>,
        registry: Arc<RoomMembershipRegistry>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            registry,
            broadcaster,
            clock,
        }
    }

    /// ルーム退出を実行し、参加状態が変化したかを返す
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<bool, ChatError> {
        let session = self.sessions.lookup(connection_id).await?;

        if !self.registry.leave(connection_id, room_id) {
            tracing::debug!(
                "'{}' left room {} but was not a member",
                session.username(),
                room_id
            );
            return Ok(false);
        }

        let now = Timestamp::new(self.clock.now_millis());
        self.broadcaster
            .to_room(room_id, OutboundEvent::user_left(session.username(), now), None)
            .await;
        tracing::info!("'{}' left room {}", session.username(), room_id);
        Ok(true)
    }
}
