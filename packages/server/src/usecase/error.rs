//! Client-facing error taxonomy of the real-time core.
//!
//! Every per-event failure is converted into one of these at the router
//! boundary and delivered to the originating connection as an `error` event.
//! The `Display` text is exactly what the client sees.

use thiserror::Error;

use crate::domain::{
    PersistenceError, PresenceError, SessionError, ValueObjectError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Token missing, invalid or not resolvable to a user
    #[error("Unauthorized")]
    Unauthorized,

    /// No live session for the connection
    #[error("Invalid session")]
    InvalidSession,

    #[error("Room not found")]
    RoomNotFound,

    #[error("{0}")]
    Validation(String),

    /// Details stay in the logs; clients get a generic message
    #[error("Internal server error")]
    Internal(String),
}

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        ChatError::Validation(message.into())
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(error: ValueObjectError) -> Self {
        ChatError::Validation(error.to_string())
    }
}

impl From<PersistenceError> for ChatError {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::RoomNotFound(_) => ChatError::RoomNotFound,
            PersistenceError::Storage(detail) => ChatError::Internal(detail),
        }
    }
}

impl From<SessionError> for ChatError {
    fn from(error: SessionError) -> Self {
        ChatError::Internal(error.to_string())
    }
}

impl From<PresenceError> for ChatError {
    fn from(error: PresenceError) -> Self {
        ChatError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_visible_texts() {
        // テスト項目: クライアントに見える文言が固定されている
        assert_eq!(ChatError::RoomNotFound.to_string(), "Room not found");
        assert_eq!(ChatError::InvalidSession.to_string(), "Invalid session");
        assert_eq!(
            ChatError::Internal("disk full".to_string()).to_string(),
            "Internal server error"
        );
    }

    #[test]
    fn test_persistence_errors_map_to_taxonomy() {
        // テスト項目: 永続化エラーはルーム不在と内部エラーに振り分けられる
        assert_eq!(
            ChatError::from(PersistenceError::RoomNotFound(9999)),
            ChatError::RoomNotFound
        );
        assert_eq!(
            ChatError::from(PersistenceError::Storage("timeout".to_string())),
            ChatError::Internal("timeout".to_string())
        );
    }

    #[test]
    fn test_value_object_errors_become_validation() {
        // テスト項目: 値オブジェクトの検証エラーは ValidationError になる
        let error = ChatError::from(ValueObjectError::MessageContentEmpty);

        assert_eq!(error, ChatError::Validation("Message cannot be empty".to_string()));
    }
}
