//! インメモリ実装（単一プロセス構成向け）

pub mod membership;
pub mod message;
pub mod presence;
pub mod session;
pub mod user;

pub use membership::InMemoryMembershipRepository;
pub use message::InMemoryMessageRepository;
pub use presence::InMemoryPresenceRepository;
pub use session::InMemorySessionRepository;
pub use user::InMemoryUserRepository;
