//! Test harness: a fully wired core over in-memory collaborators.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use flashchat_shared::time::FixedClock;

use crate::{
    domain::{
        ConnectionId, IdentityError, IdentityProvider, MessageRepository, NodeId, Room, RoomId,
        Timestamp, UserId, UserIdentity,
    },
    infrastructure::{
        fanout::BroadcastFanout,
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryMembershipRepository, InMemoryMessageRepository, InMemoryPresenceRepository,
            InMemorySessionRepository,
        },
    },
};

use super::chat_core::{ChatCore, Collaborators};

pub const NOW: i64 = 1_672_531_200_000;

/// Resolves the token `"<username>"` to a fixed user
pub struct StaticIdentityProvider {
    users: HashMap<String, UserIdentity>,
}

impl StaticIdentityProvider {
    pub fn demo() -> Self {
        let users = [(1, "alice", "Alice"), (2, "bob", "Bob"), (3, "carol", "Carol")]
            .into_iter()
            .map(|(id, username, display_name)| {
                (
                    username.to_string(),
                    UserIdentity::new(UserId::new(id).unwrap(), username, display_name),
                )
            })
            .collect();
        Self { users }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<UserIdentity, IdentityError> {
        self.users
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken(token.to_string()))
    }
}

pub fn room(id: i64, name: &str) -> Room {
    Room {
        id: RoomId::new(id).unwrap(),
        name: name.to_string(),
        description: String::new(),
        is_private: false,
        created_by: UserId::new(1).unwrap(),
        created_at: Timestamp::new(0),
    }
}

pub fn room_id(id: i64) -> RoomId {
    RoomId::new(id).unwrap()
}

/// In-memory message store with rooms 7 ("lounge") and 8 ("random")
pub fn seeded_messages() -> Arc<InMemoryMessageRepository> {
    let messages = Arc::new(InMemoryMessageRepository::new(Arc::new(FixedClock::new(NOW))));
    messages.insert_room(room(7, "lounge"));
    messages.insert_room(room(8, "random"));
    messages
}

pub struct TestApp {
    pub core: ChatCore,
    pub memberships: Arc<InMemoryMembershipRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_messages(seeded_messages())
    }

    pub fn with_messages(messages: Arc<dyn MessageRepository>) -> Self {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let clock = Arc::new(FixedClock::new(NOW));
        let core = ChatCore::assemble(Collaborators {
            sessions,
            memberships: memberships.clone(),
            messages,
            presence: Arc::new(InMemoryPresenceRepository::new(clock.clone())),
            identity: Arc::new(StaticIdentityProvider::demo()),
            pusher: pusher.clone(),
            fanout: Arc::new(BroadcastFanout::new()),
            clock,
            node_id: NodeId::new("node-test"),
        });
        Self {
            core,
            memberships,
            pusher,
        }
    }

    /// Connect with the token `username` under connection id `connection`
    pub async fn connect(&self, connection: &str, username: &str) -> TestClient {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new(connection.to_string()).unwrap();
        self.core
            .router
            .connect(id.clone(), Some(username), tx)
            .await
            .unwrap();
        TestClient { id, rx }
    }
}

pub struct TestClient {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// All frames received so far, parsed
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    /// Frames received so far whose event name is `event`
    pub fn drain_events(&mut self, event: &str) -> Vec<Value> {
        self.drain()
            .into_iter()
            .filter(|frame| frame["event"] == event)
            .collect()
    }
}
