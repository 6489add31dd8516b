//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::MessageRepository,
    usecase::{ChatCore, EventRouter, PresenceTracker},
};

/// Shared application state
pub struct AppState {
    /// イベントルーター（WebSocket の全イベントの入口）
    pub router: Arc<EventRouter>,
    /// プレゼンスの読み取り（HTTP API）
    pub presence: Arc<PresenceTracker>,
    /// メッセージ履歴の読み取り（HTTP API）
    pub messages: Arc<dyn MessageRepository>,
}

impl AppState {
    pub fn from_core(core: &ChatCore) -> Self {
        Self {
            router: core.router.clone(),
            presence: core.presence.clone(),
            messages: core.messages.clone(),
        }
    }
}
