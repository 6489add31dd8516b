//! UseCase: 接続処理
//!
//! トークンを検証してセッションを作り、送信チャンネルを登録して
//! 接続したクライアントにだけ `connected` を送ります。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionSession, MessagePusher, OutboundEvent, PusherChannel};

use super::{broadcast::RoomBroadcaster, error::ChatError, session_store::SessionStore};

pub struct ConnectUseCase {
    sessions: Arc<SessionStore>,
    pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl ConnectUseCase {
    pub fn new(
        sessions: Arc<SessionStore>,
        pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            sessions,
            pusher,
            broadcaster,
        }
    }

    /// 接続を実行
    ///
    /// 失敗時は `ChatError::Unauthorized` を返し、チャンネルは登録されません。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        token: Option<&str>,
        channel: PusherChannel,
    ) -> Result<ConnectionSession, ChatError> {
        // 1. 認証してセッションを作成
        let session = self
            .sessions
            .authenticate(connection_id.clone(), token)
            .await?;

        // 2. 送信チャンネルを登録
        self.pusher.register_client(connection_id, channel).await;

        // 3. 接続したクライアントにだけ歓迎メッセージ
        self.broadcaster
            .send_to(&session.connection_id, &OutboundEvent::welcome(&session.user))
            .await;

        Ok(session)
    }
}
