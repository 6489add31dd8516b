//! InMemory Presence Repository 実装

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use flashchat_shared::time::Clock;

use crate::domain::{PresenceError, PresenceRecord, PresenceRepository, Timestamp, UserId};

/// インメモリ Presence Repository 実装
pub struct InMemoryPresenceRepository {
    records: DashMap<UserId, PresenceRecord>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPresenceRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Number of users currently flagged online
    pub fn online_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_online).count()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn set_online(&self, user_id: UserId, online: bool) -> Result<(), PresenceError> {
        self.records
            .entry(user_id)
            .or_insert_with(|| PresenceRecord::offline(user_id))
            .is_online = online;
        Ok(())
    }

    async fn touch_last_seen(&self, user_id: UserId) -> Result<(), PresenceError> {
        let now = Timestamp::new(self.clock.now_millis());
        self.records
            .entry(user_id)
            .or_insert_with(|| PresenceRecord::offline(user_id))
            .last_seen = Some(now);
        Ok(())
    }

    async fn is_online(&self, user_id: UserId) -> Result<bool, PresenceError> {
        Ok(self.records.get(&user_id).is_some_and(|r| r.is_online))
    }

    async fn find(&self, user_id: UserId) -> Result<Option<PresenceRecord>, PresenceError> {
        Ok(self.records.get(&user_id).map(|r| *r.value()))
    }
}
