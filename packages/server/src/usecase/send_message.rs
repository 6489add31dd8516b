//! UseCase: メッセージ送信
//!
//! ## 順序保証
//!
//! ルームごとのシーケンサ（非同期 Mutex）を、永続化からブロードキャストまで保持します。
//! 同じルームへの送信は永続化された ID の順に配信され、
//! 異なるルームへの送信は互いに待ちません。
//!
//! ## キャンセル
//!
//! 永続化と配信は独立したタスクで実行し、その完了を待ちます。
//! 送信元の接続が途中で切れてハンドラが破棄されても、
//! 書き込みが完了したメッセージは必ず配信されます。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, MessageBroadcast, MessageContent, MessageRepository, MessageType,
    NewMessage, OutboundEvent, RoomId,
};

use super::{
    broadcast::RoomBroadcaster, error::ChatError, membership::RoomMembershipRegistry,
    session_store::SessionStore,
};

pub const NOT_A_MEMBER: &str = "Join the room before sending messages";

pub struct SendMessageUseCase {
    sessions: Arc<SessionStore>,
    registry: Arc<RoomMembershipRegistry>,
    messages: Arc<dyn MessageRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    /// room_id -> sequencer held across append + broadcast
    sequencers: DashMap<RoomId, Arc<Mutex<()>>>,
}

impl SendMessageUseCase {
    pub fn new(
        sessions: Arc<SessionStore>,
        registry: Arc<RoomMembershipRegistry>,
        messages: Arc<dyn MessageRepository>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            sessions,
            registry,
            messages,
            broadcaster,
            sequencers: DashMap::new(),
        }
    }

    fn sequencer_of(&self, room_id: RoomId) -> Arc<Mutex<()>> {
        self.sequencers.entry(room_id).or_default().clone()
    }

    /// メッセージ送信を実行
    ///
    /// 成功すると、送信者を含むルームの全メンバーに `message` が配信されます。
    /// 検証・永続化に失敗した場合は何も配信しません。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        content: String,
        message_type: MessageType,
    ) -> Result<ChatMessage, ChatError> {
        // 1. セッション確認
        let session = self.sessions.lookup(connection_id).await?;

        // 2. 内容の検証（トリム後に空・長すぎるものは拒否）
        let content = MessageContent::new(content)?;

        // 3. 参加確認
        if !self.registry.is_member(connection_id, room_id) {
            return Err(ChatError::validation(NOT_A_MEMBER));
        }

        // 4. 永続化とブロードキャスト（ルーム単位で直列化）
        let sequencer = self.sequencer_of(room_id);
        let sessions = self.sessions.clone();
        let messages = self.messages.clone();
        let broadcaster = self.broadcaster.clone();
        let connection_id = connection_id.clone();
        let commit = tokio::spawn(async move {
            let _turn = sequencer.lock().await;

            // 順番待ちの間に切断されていないか再検証
            if !sessions.is_live(&connection_id).await? {
                return Err(ChatError::InvalidSession);
            }

            let message = messages
                .append_message(NewMessage {
                    room_id,
                    user_id: session.user_id(),
                    content,
                    message_type,
                })
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        "Failed to persist message from '{}' ({}) in room {}: {}",
                        session.username(),
                        connection_id,
                        room_id,
                        e
                    );
                })?;

            broadcaster
                .to_room(
                    room_id,
                    OutboundEvent::Message(MessageBroadcast {
                        message: message.clone(),
                        author: session.user.clone(),
                    }),
                    None,
                )
                .await;
            tracing::debug!(
                "Message {} from '{}' broadcast to room {}",
                message.id,
                session.username(),
                room_id
            );
            Ok::<_, ChatError>(message)
        });

        commit
            .await
            .map_err(|e| ChatError::Internal(format!("send task failed: {e}")))?
    }
}
