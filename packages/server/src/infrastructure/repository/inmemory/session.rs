//! InMemory Session Repository 実装
//!
//! 単一プロセス構成向けのセッションストア。
//! 接続単位のシャード化されたマップ（`DashMap`）を使い、全体ロックを持ちません。

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{ConnectionId, ConnectionSession, SessionError, SessionRepository, UserId};

/// インメモリ Session Repository 実装
#[derive(Default)]
pub struct InMemorySessionRepository {
    /// connection_id -> session
    sessions: DashMap<ConnectionId, ConnectionSession>,
    /// user_id -> live connection ids of that user
    by_user: DashMap<UserId, HashSet<ConnectionId>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn unindex(&self, user_id: UserId, connection_id: &ConnectionId) {
        self.by_user.remove_if_mut(&user_id, |_, connections| {
            connections.remove(connection_id);
            connections.is_empty()
        });
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: ConnectionSession) -> Result<(), SessionError> {
        let connection_id = session.connection_id.clone();
        let user_id = session.user_id();

        self.by_user
            .entry(user_id)
            .or_default()
            .insert(connection_id.clone());

        if let Some(previous) = self.sessions.insert(connection_id.clone(), session)
            && previous.user_id() != user_id
        {
            self.unindex(previous.user_id(), &connection_id);
        }
        Ok(())
    }

    async fn find(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionSession>, SessionError> {
        Ok(self
            .sessions
            .get(connection_id)
            .map(|entry| entry.value().clone()))
    }

    async fn remove(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionSession>, SessionError> {
        let removed = self.sessions.remove(connection_id).map(|(_, session)| session);
        if let Some(session) = &removed {
            self.unindex(session.user_id(), connection_id);
        }
        Ok(removed)
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<usize, SessionError> {
        Ok(self
            .by_user
            .get(&user_id)
            .map(|connections| connections.len())
            .unwrap_or(0))
    }

    async fn count(&self) -> Result<usize, SessionError> {
        Ok(self.sessions.len())
    }
}
