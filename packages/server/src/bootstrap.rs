//! Dependency wiring for a standalone server process.

use std::{path::PathBuf, sync::Arc};

use flashchat_shared::time::{Clock, SystemClock};

use crate::{
    domain::{NodeId, NodeIdFactory, Timestamp},
    infrastructure::{
        fanout::BroadcastFanout,
        fixtures::{FixtureError, Fixtures},
        identity::JwtIdentityProvider,
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryMembershipRepository, InMemoryMessageRepository, InMemoryPresenceRepository,
            InMemorySessionRepository, InMemoryUserRepository,
        },
    },
    ui::Server,
    usecase::{ChatCore, Collaborators},
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HS256 secret shared with the token issuer
    pub jwt_secret: String,
    /// Identity of this process on the fan-out transport; random if `None`
    pub node_id: Option<String>,
    /// JSON seed file; built-in demo data if `None`
    pub fixtures: Option<PathBuf>,
    /// Lifetime of tokens issued by this process
    pub token_ttl_secs: u64,
}

/// A wired server plus the handles operators and tests need
pub struct App {
    pub server: Server,
    pub identity: Arc<JwtIdentityProvider>,
    pub node_id: NodeId,
}

/// Build every collaborator and assemble the server.
///
/// # Errors
///
/// Returns an error if the fixtures cannot be loaded.
pub fn build(config: &AppConfig) -> Result<App, FixtureError> {
    // 1. Clock
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 2. Repositories (user directory and rooms seeded from fixtures)
    let users = Arc::new(InMemoryUserRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new(clock.clone()));
    let fixtures = match &config.fixtures {
        Some(path) => Fixtures::load(path)?,
        None => Fixtures::demo(),
    };
    fixtures.seed(&users, &messages, Timestamp::new(clock.now_millis()))?;

    // 3. Identity
    let identity = Arc::new(
        JwtIdentityProvider::new(config.jwt_secret.as_bytes(), users)
            .with_token_ttl(config.token_ttl_secs),
    );

    // 4. Delivery (local pusher and fan-out transport)
    let node_id = config
        .node_id
        .clone()
        .map(NodeId::new)
        .unwrap_or_else(NodeIdFactory::generate);

    // 5. Core
    let core = ChatCore::assemble(Collaborators {
        sessions: Arc::new(InMemorySessionRepository::new()),
        memberships: Arc::new(InMemoryMembershipRepository::new()),
        messages,
        presence: Arc::new(InMemoryPresenceRepository::new(clock.clone())),
        identity: identity.clone(),
        pusher: Arc::new(WebSocketMessagePusher::new()),
        fanout: Arc::new(BroadcastFanout::new()),
        clock,
        node_id: node_id.clone(),
    });
    tracing::info!("Chat core assembled (node {})", node_id);

    // 6. Server
    Ok(App {
        server: Server::new(core),
        identity,
        node_id,
    })
}
