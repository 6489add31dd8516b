//! InMemory Message Repository 実装
//!
//! ルームとメッセージログをプロセス内に保持するメッセージ永続化ゲートウェイ。
//! ルームごとに独立したロックを持つため、異なるルームへの追記は互いに待ちません。
//! ID の採番はルームのロック内で行うため、同一ルーム内では追記順に単調増加します。

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use flashchat_shared::time::Clock;

use crate::domain::{
    ChatMessage, MessageId, MessageRepository, NewMessage, PersistenceError, Room, RoomId,
    Timestamp,
};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    rooms: DashMap<RoomId, Room>,
    /// Per-room append-only log
    logs: DashMap<RoomId, Arc<Mutex<Vec<ChatMessage>>>>,
    next_id: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: DashMap::new(),
            logs: DashMap::new(),
            next_id: AtomicI64::new(1),
            clock,
        }
    }

    /// Register a room (seeding / tests; room CRUD lives outside the real-time core)
    pub fn insert_room(&self, room: Room) {
        self.logs.entry(room.id).or_default();
        self.rooms.insert(room.id, room);
    }

    fn log_of(&self, room_id: RoomId) -> Option<Arc<Mutex<Vec<ChatMessage>>>> {
        self.logs.get(&room_id).map(|log| log.value().clone())
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>, PersistenceError> {
        Ok(self.rooms.get(&room_id).map(|room| room.value().clone()))
    }

    async fn append_message(&self, message: NewMessage) -> Result<ChatMessage, PersistenceError> {
        let log = self
            .log_of(message.room_id)
            .ok_or(PersistenceError::RoomNotFound(message.room_id.value()))?;

        let mut log = log.lock().await;
        let stored = ChatMessage {
            id: MessageId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            content: message.content,
            user_id: message.user_id,
            room_id: message.room_id,
            timestamp: Timestamp::new(self.clock.now_millis()),
            message_type: message.message_type,
            edited_at: None,
        };
        log.push(stored.clone());
        tracing::debug!(
            "Appended message {} to room {} (log size: {})",
            stored.id,
            stored.room_id,
            log.len()
        );
        Ok(stored)
    }

    async fn list_messages(
        &self,
        room_id: RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, PersistenceError> {
        let log = self
            .log_of(room_id)
            .ok_or(PersistenceError::RoomNotFound(room_id.value()))?;
        let log = log.lock().await;
        let start = log.len().saturating_sub(limit);
        Ok(log[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, MessageType, UserId};
    use flashchat_shared::time::FixedClock;

    fn room(id: i64, name: &str) -> Room {
        Room {
            id: RoomId::new(id).unwrap(),
            name: name.to_string(),
            description: String::new(),
            is_private: false,
            created_by: UserId::new(1).unwrap(),
            created_at: Timestamp::new(0),
        }
    }

    fn new_message(room_id: i64, content: &str) -> NewMessage {
        NewMessage {
            room_id: RoomId::new(room_id).unwrap(),
            user_id: UserId::new(1).unwrap(),
            content: MessageContent::new(content.to_string()).unwrap(),
            message_type: MessageType::Text,
        }
    }

    fn create_test_repository() -> InMemoryMessageRepository {
        let repo = InMemoryMessageRepository::new(Arc::new(FixedClock::new(42)));
        repo.insert_room(room(7, "general"));
        repo.insert_room(room(8, "random"));
        repo
    }

    #[tokio::test]
    async fn test_append_assigns_id_and_timestamp() {
        // テスト項目: 追記時に ID とタイムスタンプが採番される
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let message = repo.append_message(new_message(7, "hi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.id, MessageId::new(1));
        assert_eq!(message.timestamp, Timestamp::new(42));
        assert_eq!(message.content.as_str(), "hi");
        assert_eq!(message.edited_at, None);
    }

    #[tokio::test]
    async fn test_append_to_unknown_room_fails() {
        // テスト項目: 存在しないルームへの追記はエラー
        let repo = create_test_repository();

        let result = repo.append_message(new_message(9999, "hi")).await;

        assert_eq!(result, Err(PersistenceError::RoomNotFound(9999)));
    }

    #[tokio::test]
    async fn test_room_lookup() {
        // テスト項目: ルームを取得でき、存在しないルームは None
        let repo = create_test_repository();
        let general = RoomId::new(7).unwrap();
        let missing = RoomId::new(9999).unwrap();

        assert_eq!(
            repo.find_room(general).await.unwrap().unwrap().name,
            "general"
        );
        assert!(repo.find_room(missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_messages_returns_latest_in_ascending_order() {
        // テスト項目: 直近 N 件を ID 昇順で取得できる
        // given (前提条件):
        let repo = create_test_repository();
        for content in ["one", "two", "three"] {
            repo.append_message(new_message(7, content)).await.unwrap();
        }
        repo.append_message(new_message(8, "elsewhere")).await.unwrap();

        // when (操作):
        let messages = repo
            .list_messages(RoomId::new(7).unwrap(), 2)
            .await
            .unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three"]);
        assert!(messages[0].id < messages[1].id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_produce_unique_monotonic_ids() {
        // テスト項目: 同一ルームへの同時追記でも ID は重複せず、ログ順に単調増加する
        let repo = Arc::new(create_test_repository());
        let mut handles = Vec::new();
        for i in 0..50 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.append_message(new_message(7, &format!("m{i}")))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let log = repo
            .list_messages(RoomId::new(7).unwrap(), 100)
            .await
            .unwrap();
        assert_eq!(log.len(), 50);
        assert!(log.windows(2).all(|pair| pair[0].id < pair[1].id));
    }
}
