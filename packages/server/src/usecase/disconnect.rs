//! UseCase: 切断処理
//!
//! 切断は常に成功します。順序は次の通りです。
//!
//! 1. セッション削除（最後のセッションならオフライン）
//! 2. 全ルームから退出
//! 3. 送信チャンネルの登録解除
//! 4. 参加していた各ルームへ `user_left`
//!
//! セッションを先に消すことで、並行して処理中の join / send は
//! 再検証で失敗し、切断後の接続がルームに残ることはありません。

use std::sync::Arc;

use flashchat_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, RoomId, Timestamp};

use super::{
    broadcast::RoomBroadcaster, membership::RoomMembershipRegistry, session_store::SessionStore,
};

pub struct DisconnectUseCase {
    sessions: Arc<SessionStore>,
    registry: Arc<RoomMembershipRegistry>,
    pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl DisconnectUseCase {
    pub fn new(
        sessions: Arc<SessionStore>,
        registry: Arc<RoomMembershipRegistry>,
        pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            registry,
            pusher,
            broadcaster,
            clock,
        }
    }

    /// 切断を実行し、参加していたルームを返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let session = match self.sessions.destroy(connection_id).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Failed to remove session of '{}': {:?}", connection_id, e);
                None
            }
        };
        let rooms = self.registry.drop_connection(connection_id);
        self.pusher.unregister_client(connection_id).await;

        if let Some(session) = &session {
            let now = Timestamp::new(self.clock.now_millis());
            for room_id in &rooms {
                self.broadcaster
                    .to_room(
                        *room_id,
                        OutboundEvent::user_left(session.username(), now),
                        None,
                    )
                    .await;
            }
            tracing::info!(
                "Connection '{}' ({}) disconnected, left {} room(s)",
                connection_id,
                session.username(),
                rooms.len()
            );
        } else {
            tracing::debug!("Connection '{}' disconnected without a session", connection_id);
        }
        rooms
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{ClientCommand, UserId},
        usecase::test_support::{TestApp, room_id},
    };

    #[tokio::test]
    async fn test_disconnect_cleans_up_everything() {
        // テスト項目: 切断でセッション・参加状態・送信チャンネル・プレゼンスが片付き、
        //            参加していた全ルームに user_left が届く
        // given (前提条件):
        let app = TestApp::new();
        let alice = app.connect("c-alice", "alice").await;
        let mut bob = app.connect("c-bob", "bob").await;
        for room in [7, 8] {
            for client in [&alice, &bob] {
                app.core
                    .router
                    .dispatch(&client.id, ClientCommand::JoinRoom { room_id: room_id(room) })
                    .await;
            }
        }
        bob.drain();

        // when (操作):
        let rooms = app.core.router.disconnect(&alice.id).await;

        // then (期待する結果):
        assert_eq!(rooms, vec![room_id(7), room_id(8)]);
        assert_eq!(bob.drain_events("user_left").len(), 2);
        assert!(!app.core.session_store.is_live(&alice.id).await.unwrap());
        assert!(app.core.registry.rooms_of(&alice.id).is_empty());
        assert_eq!(app.pusher.client_count().await, 1);
        assert!(
            !app.core
                .presence
                .is_online(UserId::new(1).unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_harmless() {
        // テスト項目: 2 回目の切断は何もしない
        let app = TestApp::new();
        let alice = app.connect("c-alice", "alice").await;

        app.core.router.disconnect(&alice.id).await;
        let rooms = app.core.router.disconnect(&alice.id).await;

        assert!(rooms.is_empty());
    }
}
