//! Session Store
//!
//! 接続 ID と認証済みユーザーの対応を、接続が生きている間だけ保持します。
//! 後続のイベントはすべて `lookup` で毎回ユーザーを解決し直します。
//!
//! トークン検証（await を伴う）はセッション保存より前に終わらせ、
//! ストアへの書き込み中に外部呼び出しを待つことはありません。

use std::sync::Arc;

use flashchat_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionSession, IdentityProvider, SessionRepository, Timestamp,
};

use super::{error::ChatError, presence::PresenceTracker};

pub struct SessionStore {
    sessions: Arc<dyn SessionRepository>,
    identity: Arc<dyn IdentityProvider>,
    presence: Arc<PresenceTracker>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        identity: Arc<dyn IdentityProvider>,
        presence: Arc<PresenceTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            identity,
            presence,
            clock,
        }
    }

    /// Verify the credential and bind the connection to the resolved user.
    ///
    /// Marks the user online. Presence failures are logged and do not fail
    /// the connection.
    pub async fn authenticate(
        &self,
        connection_id: ConnectionId,
        token: Option<&str>,
    ) -> Result<ConnectionSession, ChatError> {
        let Some(token) = token else {
            tracing::warn!("Connection '{}' rejected: no token", connection_id);
            return Err(ChatError::Unauthorized);
        };
        let user = self.identity.verify_token(token).await.map_err(|e| {
            tracing::warn!("Connection '{}' rejected: {}", connection_id, e);
            ChatError::Unauthorized
        })?;

        let session = ConnectionSession::new(
            connection_id,
            user,
            Timestamp::new(self.clock.now_millis()),
        );
        self.sessions.save(session.clone()).await?;

        if let Err(e) = self.presence.session_opened(session.user_id()).await {
            tracing::warn!(
                "Failed to mark user {} online: {:?}",
                session.user_id(),
                e
            );
        }
        tracing::info!(
            "Connection '{}' authenticated as '{}' ({})",
            session.connection_id,
            session.username(),
            session.user_id()
        );
        Ok(session)
    }

    /// Resolve the session of a connection, or `InvalidSession`
    pub async fn lookup(&self, connection_id: &ConnectionId) -> Result<ConnectionSession, ChatError> {
        self.sessions
            .find(connection_id)
            .await?
            .ok_or(ChatError::InvalidSession)
    }

    pub async fn is_live(&self, connection_id: &ConnectionId) -> Result<bool, ChatError> {
        Ok(self.sessions.find(connection_id).await?.is_some())
    }

    /// Remove the session and mark the user offline if it was their last one.
    ///
    /// Idempotent: returns `None` when there was no session.
    pub async fn destroy(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionSession>, ChatError> {
        let Some(session) = self.sessions.remove(connection_id).await? else {
            return Ok(None);
        };
        match self.presence.session_closed(session.user_id()).await {
            Ok(true) => tracing::debug!("User {} has no sessions left", session.user_id()),
            Ok(false) => {}
            Err(e) => tracing::warn!(
                "Failed to update presence of user {}: {:?}",
                session.user_id(),
                e
            ),
        }
        Ok(Some(session))
    }

    pub async fn count(&self) -> Result<usize, ChatError> {
        Ok(self.sessions.count().await?)
    }
}
