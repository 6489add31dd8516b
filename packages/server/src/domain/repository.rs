//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! - `SessionRepository`: 接続セッションの保存先。単一プロセスではインメモリ、
//!   水平スケール時は共有の外部ストアに差し替える
//! - `MembershipRepository`: ルーム参加状態（揮発、永続化しない）
//! - `MessageRepository`: ルームの存在確認とメッセージログ（永続）
//! - `UserRepository`: ユーザーディレクトリ（読み取り専用）
//! - `PresenceRepository`: ユーザー単位のオンライン状態（永続）

use async_trait::async_trait;

use super::{
    ChatMessage, ConnectionId, ConnectionSession, NewMessage, PersistenceError, PresenceError,
    PresenceRecord, Room, RoomId, SessionError, UserId, UserIdentity,
};

/// Connection session storage.
///
/// Implementations must be safe to call from many connection tasks at once
/// and must not serialize unrelated connections behind one lock.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store (or replace) the session of a connection
    async fn save(&self, session: ConnectionSession) -> Result<(), SessionError>;

    /// Find the session of a connection
    async fn find(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionSession>, SessionError>;

    /// Remove the session of a connection, returning it if it existed
    async fn remove(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionSession>, SessionError>;

    /// Number of live sessions held by a user
    async fn count_for_user(&self, user_id: UserId) -> Result<usize, SessionError>;

    /// Number of live sessions
    async fn count(&self) -> Result<usize, SessionError>;
}

/// Ephemeral room membership of live connections.
///
/// All operations are synchronous and never await: callers perform room
/// existence checks and other remote calls before touching the registry.
pub trait MembershipRepository: Send + Sync {
    /// Register membership and return a snapshot of the room's members afterwards
    fn join(&self, connection_id: &ConnectionId, room_id: RoomId) -> Vec<ConnectionId>;

    /// Remove membership. Returns `true` if the connection was a member.
    fn leave(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool;

    /// Point-in-time snapshot of a room's members
    fn members_of(&self, room_id: RoomId) -> Vec<ConnectionId>;

    fn is_member(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool;

    /// Rooms a connection currently belongs to
    fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// Remove every membership of a connection and return the rooms it was in
    fn drop_connection(&self, connection_id: &ConnectionId) -> Vec<RoomId>;
}

/// Message persistence gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Look up a room by id. `None` means the room does not exist.
    ///
    /// Joining needs the room name for `room_joined`, so this lookup doubles as
    /// the existence check.
    async fn find_room(&self, room_id: RoomId) -> Result<Option<Room>, PersistenceError>;

    /// Durably append a message, assigning its id and timestamp.
    ///
    /// Ids are unique and, within one room, strictly increasing in append order.
    async fn append_message(&self, message: NewMessage) -> Result<ChatMessage, PersistenceError>;

    /// The most recent `limit` messages of a room, in ascending id order
    async fn list_messages(
        &self,
        room_id: RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, PersistenceError>;
}

/// Read-only user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserIdentity>, PersistenceError>;
}

/// Durable per-user presence store.
///
/// Every operation is idempotent and accepts users that have no live sessions.
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    async fn set_online(&self, user_id: UserId, online: bool) -> Result<(), PresenceError>;

    async fn touch_last_seen(&self, user_id: UserId) -> Result<(), PresenceError>;

    async fn is_online(&self, user_id: UserId) -> Result<bool, PresenceError>;

    async fn find(&self, user_id: UserId) -> Result<Option<PresenceRecord>, PresenceError>;
}
