//! Domain layer for the chat service.
//!
//! This module contains business types and the interfaces of every
//! collaborator the real-time core talks to. It is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod fanout;
pub mod identity;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, ConnectionSession, MessageType, NewMessage, PresenceRecord, Room, UserIdentity,
};
pub use error::{
    FanoutError, IdentityError, MessagePushError, PersistenceError, PresenceError, SessionError,
    ValueObjectError,
};
pub use event::{
    ClientCommand, CommandKind, InvalidCommand, MessageBroadcast, OutboundEvent, RoomEnvelope,
};
pub use factory::{ConnectionIdFactory, NodeIdFactory};
pub use fanout::{FanoutSubscription, FanoutTransport};
pub use identity::IdentityProvider;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{
    MembershipRepository, MessageRepository, PresenceRepository, SessionRepository,
    UserRepository,
};
pub use value_object::{
    ConnectionId, MessageContent, MessageId, NodeId, RoomId, Timestamp, UserId,
};

#[cfg(test)]
pub use identity::MockIdentityProvider;
#[cfg(test)]
pub use repository::{MockMessageRepository, MockUserRepository};
