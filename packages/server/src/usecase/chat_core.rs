//! Assembly of the real-time core from its collaborators.

use std::sync::Arc;

use flashchat_shared::time::Clock;

use crate::domain::{
    FanoutTransport, IdentityProvider, MembershipRepository, MessagePusher, MessageRepository,
    NodeId, PresenceRepository, SessionRepository,
};

use super::{
    broadcast::RoomBroadcaster, connect::ConnectUseCase, disconnect::DisconnectUseCase,
    join_room::JoinRoomUseCase, leave_room::LeaveRoomUseCase, membership::RoomMembershipRegistry,
    presence::PresenceTracker, router::EventRouter, send_message::SendMessageUseCase,
    session_store::SessionStore, typing::TypingUseCase,
};

/// Everything the core talks to
pub struct Collaborators {
    pub sessions: Arc<dyn SessionRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub presence: Arc<dyn PresenceRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub pusher: Arc<dyn MessagePusher>,
    pub fanout: Arc<dyn FanoutTransport>,
    pub clock: Arc<dyn Clock>,
    pub node_id: NodeId,
}

/// Owned, injectable services of one server process
pub struct ChatCore {
    pub router: Arc<EventRouter>,
    pub session_store: Arc<SessionStore>,
    pub registry: Arc<RoomMembershipRegistry>,
    pub presence: Arc<PresenceTracker>,
    pub broadcaster: Arc<RoomBroadcaster>,
    pub messages: Arc<dyn MessageRepository>,
}

impl ChatCore {
    pub fn assemble(c: Collaborators) -> Self {
        // 1. Services
        let presence = Arc::new(PresenceTracker::new(c.presence, c.sessions.clone()));
        let session_store = Arc::new(SessionStore::new(
            c.sessions,
            c.identity,
            presence.clone(),
            c.clock.clone(),
        ));
        let registry = Arc::new(RoomMembershipRegistry::new(
            c.memberships.clone(),
            c.messages.clone(),
        ));
        let broadcaster = Arc::new(RoomBroadcaster::new(
            c.memberships,
            c.pusher.clone(),
            c.fanout,
            c.node_id,
        ));

        // 2. UseCases
        let connect = ConnectUseCase::new(
            session_store.clone(),
            c.pusher.clone(),
            broadcaster.clone(),
        );
        let disconnect = DisconnectUseCase::new(
            session_store.clone(),
            registry.clone(),
            c.pusher,
            broadcaster.clone(),
            c.clock.clone(),
        );
        let join_room = JoinRoomUseCase::new(
            session_store.clone(),
            registry.clone(),
            broadcaster.clone(),
            c.clock.clone(),
        );
        let leave_room = LeaveRoomUseCase::new(
            session_store.clone(),
            registry.clone(),
            broadcaster.clone(),
            c.clock,
        );
        let send_message = SendMessageUseCase::new(
            session_store.clone(),
            registry.clone(),
            c.messages.clone(),
            broadcaster.clone(),
        );
        let typing = TypingUseCase::new(session_store.clone(), registry.clone(), broadcaster.clone());

        // 3. Router
        let router = Arc::new(EventRouter::new(
            connect,
            disconnect,
            join_room,
            leave_room,
            send_message,
            typing,
            broadcaster.clone(),
        ));

        Self {
            router,
            session_store,
            registry,
            presence,
            broadcaster,
            messages: c.messages,
        }
    }
}
