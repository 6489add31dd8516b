//! UseCase: ルーム参加
//!
//! ルームの存在確認後に参加を登録し、await を挟んだ後でセッションが
//! まだ生きているかを再検証します。切断と競合した場合は参加を取り消します。

use std::sync::Arc;

use flashchat_shared::time::Clock;

use crate::domain::{ConnectionId, OutboundEvent, Room, RoomId, Timestamp};

use super::{
    broadcast::RoomBroadcaster, error::ChatError, membership::RoomMembershipRegistry,
    session_store::SessionStore,
};

pub struct JoinRoomUseCase {
    sessions: Arc<SessionStore>,
    registry: Arc<RoomMembershipRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// ルーム参加を実行
    ///
    /// 送信者に `room_joined`、参加者本人を含むルーム全体に `user_joined` を送ります。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<Room, ChatError> {
        // 1. セッション確認
        let session = self.sessions.lookup(connection_id).await?;

        // 2. ルームの存在確認と参加登録
        let (room, _members) = self.registry.join(connection_id, room_id).await?;

        // 3. 切断と競合していないか再検証
        if !self.sessions.is_live(connection_id).await? {
            self.registry.leave(connection_id, room_id);
            tracing::debug!(
                "Connection '{}' disconnected while joining room {}",
                connection_id,
                room_id
            );
            return Err(ChatError::InvalidSession);
        }

        // 4. 通知
        self.broadcaster
            .send_to(
                connection_id,
                &OutboundEvent::RoomJoined {
                    room_id: room.id,
                    room_name: room.name.clone(),
                },
            )
            .await;
        let now = Timestamp::new(self.clock.now_millis());
        self.broadcaster
            .to_room(
                room_id,
                OutboundEvent::user_joined(session.username(), now),
                None,
            )
            .await;

        tracing::info!("'{}' joined room {} ({})", session.username(), room.id, room.name);
        Ok(room)
    }
}
