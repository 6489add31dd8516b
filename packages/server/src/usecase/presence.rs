//! Presence Tracker
//!
//! ユーザー単位のオンライン状態を、接続セッションの開始・終了に合わせて更新します。
//! 1 人のユーザーが複数の接続を持てるため、オフラインにするのは最後のセッションが
//! 閉じたときだけです。
//!
//! セッション数の確認とプレゼンス更新の間に同じユーザーの別の接続が割り込まないよう、
//! ユーザーごとのロックで直列化します（他のユーザーの更新は待ちません）。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::{PresenceRecord, PresenceRepository, SessionRepository, UserId};

use super::error::ChatError;

pub struct PresenceTracker {
    presence: Arc<dyn PresenceRepository>,
    sessions: Arc<dyn SessionRepository>,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl PresenceTracker {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            presence,
            sessions,
            user_locks: DashMap::new(),
        }
    }

    fn lock_of(&self, user_id: UserId) -> Arc<Mutex<()>> {
        self.user_locks.entry(user_id).or_default().clone()
    }

    fn release(&self, user_id: UserId) {
        self.user_locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// A session of `user_id` has been stored
    pub async fn session_opened(&self, user_id: UserId) -> Result<(), ChatError> {
        let lock = self.lock_of(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.mark(user_id, true).await
        };
        drop(lock);
        self.release(user_id);
        result
    }

    /// A session of `user_id` has been removed.
    ///
    /// Returns `true` if it was the user's last session and the user went offline.
    pub async fn session_closed(&self, user_id: UserId) -> Result<bool, ChatError> {
        let lock = self.lock_of(user_id);
        let result = {
            let _guard = lock.lock().await;
            match self.sessions.count_for_user(user_id).await {
                Ok(0) => self.mark(user_id, false).await.map(|()| true),
                Ok(_) => Ok(false),
                Err(e) => Err(e.into()),
            }
        };
        drop(lock);
        self.release(user_id);
        result
    }

    async fn mark(&self, user_id: UserId, online: bool) -> Result<(), ChatError> {
        self.presence.set_online(user_id, online).await?;
        self.presence.touch_last_seen(user_id).await?;
        tracing::debug!("User {} is now {}", user_id, if online { "online" } else { "offline" });
        Ok(())
    }

    pub async fn is_online(&self, user_id: UserId) -> Result<bool, ChatError> {
        Ok(self.presence.is_online(user_id).await?)
    }

    /// Presence of a user; users never seen are reported offline
    pub async fn find(&self, user_id: UserId) -> Result<PresenceRecord, ChatError> {
        Ok(self
            .presence
            .find(user_id)
            .await?
            .unwrap_or_else(|| PresenceRecord::offline(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, ConnectionSession, Timestamp, UserIdentity},
        infrastructure::repository::{InMemoryPresenceRepository, InMemorySessionRepository},
    };
    use flashchat_shared::time::FixedClock;

    fn setup() -> (PresenceTracker, Arc<InMemorySessionRepository>) {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let presence = Arc::new(InMemoryPresenceRepository::new(Arc::new(FixedClock::new(
            5_000,
        ))));
        (PresenceTracker::new(presence, sessions.clone()), sessions)
    }

    fn session(connection: &str, user_id: i64) -> ConnectionSession {
        ConnectionSession::new(
            ConnectionId::new(connection.to_string()).unwrap(),
            UserIdentity::new(UserId::new(user_id).unwrap(), "alice", "Alice"),
            Timestamp::new(0),
        )
    }

    #[tokio::test]
    async fn test_online_until_last_session_closes() {
        // テスト項目: 最後のセッションが閉じるまでオンラインのまま
        // given (前提条件): 同一ユーザーが 2 接続
        let (tracker, sessions) = setup();
        let user = UserId::new(1).unwrap();
        let laptop = session("c-1", 1);
        let phone = session("c-2", 1);
        for s in [&laptop, &phone] {
            sessions.save(s.clone()).await.unwrap();
            tracker.session_opened(user).await.unwrap();
        }

        // when (操作): 1 つ目を閉じる
        sessions.remove(&laptop.connection_id).await.unwrap();
        let went_offline = tracker.session_closed(user).await.unwrap();

        // then (期待する結果):
        assert!(!went_offline);
        assert!(tracker.is_online(user).await.unwrap());

        sessions.remove(&phone.connection_id).await.unwrap();
        assert!(tracker.session_closed(user).await.unwrap());
        assert!(!tracker.is_online(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_last_seen_is_touched() {
        // テスト項目: オンライン・オフライン遷移で last_seen が更新される
        let (tracker, sessions) = setup();
        let user = UserId::new(1).unwrap();
        sessions.save(session("c-1", 1)).await.unwrap();

        tracker.session_opened(user).await.unwrap();

        let record = tracker.find(user).await.unwrap();
        assert!(record.is_online);
        assert_eq!(record.last_seen, Some(Timestamp::new(5_000)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_offline_and_close_is_idempotent() {
        // テスト項目: セッションのないユーザーは offline、close は冪等
        let (tracker, _sessions) = setup();
        let user = UserId::new(42).unwrap();

        assert_eq!(tracker.find(user).await.unwrap(), PresenceRecord::offline(user));
        assert!(tracker.session_closed(user).await.unwrap());
        assert!(tracker.session_closed(user).await.unwrap());
        assert!(!tracker.is_online(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_locks_are_released() {
        // テスト項目: 処理後にユーザーごとのロックが残らない
        let (tracker, _sessions) = setup();
        let user = UserId::new(1).unwrap();

        tracker.session_opened(user).await.unwrap();
        tracker.session_closed(user).await.unwrap();

        assert!(tracker.user_locks.is_empty());
    }
}
