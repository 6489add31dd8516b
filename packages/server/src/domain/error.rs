//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    #[error("UserId must be positive (got {0})")]
    UserIdNotPositive(i64),

    #[error("RoomId must be positive (got {0})")]
    RoomIdNotPositive(i64),

    #[error("Message cannot be empty")]
    MessageContentEmpty,

    #[error("Message cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),
}

/// Errors raised by session storage backends
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The backing store could not be reached or returned garbage
    #[error("Session storage failure: {0}")]
    Storage(String),
}

/// Errors raised while verifying or issuing credential tokens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Credential token is missing")]
    MissingToken,

    #[error("Credential token is invalid: {0}")]
    InvalidToken(String),

    #[error("User {0} does not exist")]
    UnknownUser(i64),

    #[error("Failed to sign credential token: {0}")]
    Signing(String),

    #[error("User directory failure: {0}")]
    Directory(String),
}

/// Errors raised by the message persistence gateway
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Room {0} not found")]
    RoomNotFound(i64),

    #[error("Persistence failure: {0}")]
    Storage(String),
}

/// Errors raised by the presence store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PresenceError {
    #[error("Presence storage failure: {0}")]
    Storage(String),
}

/// Errors related to message pushing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// Connection not found in the pusher registry
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    /// Failed to push message to the connection's channel
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// Errors related to cross-process fan-out
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FanoutError {
    #[error("Failed to publish room event: {0}")]
    PublishFailed(String),
}
