//! UseCase layer: the real-time core.
//!
//! - `session_store` / `presence`: 接続セッションとユーザー単位のプレゼンス
//! - `membership`: ルーム参加レジストリ
//! - `broadcast`: ローカル配信とファンアウト
//! - 各イベントのユースケースと、それらを束ねる `router`

pub mod broadcast;
pub mod chat_core;
pub mod connect;
pub mod disconnect;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod membership;
pub mod presence;
pub mod router;
pub mod send_message;
pub mod session_store;
pub mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::RoomBroadcaster;
pub use chat_core::{ChatCore, Collaborators};
pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::ChatError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use membership::RoomMembershipRegistry;
pub use presence::PresenceTracker;
pub use router::EventRouter;
pub use send_message::SendMessageUseCase;
pub use session_store::SessionStore;
pub use typing::TypingUseCase;
