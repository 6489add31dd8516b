//! Cross-process fan-out transport interface.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::{FanoutError, RoomEnvelope};

/// Stream of envelopes published by any process (including this one)
pub type FanoutSubscription = BoxStream<'static, Arc<RoomEnvelope>>;

/// Pub/sub transport connecting every server process.
///
/// `publish` should reach every subscribed process at least once. No ordering is
/// promised across processes. Implementations document any weaker guarantee.
#[async_trait]
pub trait FanoutTransport: Send + Sync {
    async fn publish(&self, envelope: RoomEnvelope) -> Result<(), FanoutError>;

    fn subscribe(&self) -> FanoutSubscription;
}
