//! In-process fan-out over a `tokio::sync::broadcast` channel.
//!
//! Every subscriber sees every envelope, as long as it keeps up.
//!
//! Limitation: this transport is at-most-once, not at-least-once. A subscriber
//! that falls more than `FANOUT_CAPACITY` envelopes behind loses the overwritten
//! ones (`RecvError::Lagged`): the loss is logged and the stream resumes with the
//! oldest envelope still buffered. Members on the lagging node miss those events.
//! A shared broker with acknowledgements is needed to close that gap across
//! processes.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::domain::{FanoutError, FanoutSubscription, FanoutTransport, RoomEnvelope};

/// Capacity of the broadcast channel
pub const FANOUT_CAPACITY: usize = 4096;

#[derive(Clone)]
pub struct BroadcastFanout {
    sender: broadcast::Sender<Arc<RoomEnvelope>>,
}

impl BroadcastFanout {
    pub fn new() -> Self {
        Self::with_capacity(FANOUT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastFanout {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FanoutTransport for BroadcastFanout {
    async fn publish(&self, envelope: RoomEnvelope) -> Result<(), FanoutError> {
        // send() only fails when nobody subscribes, which is not a transport failure
        if self.sender.send(Arc::new(envelope)).is_err() {
            tracing::debug!("Fan-out envelope dropped: no subscribers");
        }
        Ok(())
    }

    fn subscribe(&self) -> FanoutSubscription {
        let receiver = self.sender.subscribe();
        stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(envelope) => return Some((envelope, receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Fan-out subscriber lagged, {} envelope(s) lost and not redelivered",
                            skipped
                        );
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeId, OutboundEvent, RoomId};

    fn envelope(room_id: i64, text: &str) -> RoomEnvelope {
        RoomEnvelope {
            origin: NodeId::new("node-a"),
            room_id: RoomId::new(room_id).unwrap(),
            exclude: None,
            event: OutboundEvent::error(text),
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_published_envelope() {
        // テスト項目: 全ての購読者が発行された封筒を受け取る
        // given (前提条件):
        let fanout = BroadcastFanout::new();
        let mut first = fanout.subscribe();
        let mut second = fanout.subscribe();

        // when (操作):
        fanout.publish(envelope(7, "hello")).await.unwrap();

        // then (期待する結果):
        assert_eq!(first.next().await.unwrap().room_id, RoomId::new(7).unwrap());
        assert_eq!(second.next().await.unwrap().room_id, RoomId::new(7).unwrap());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        // テスト項目: 購読者がいなくても発行は成功する
        let fanout = BroadcastFanout::new();

        assert!(fanout.publish(envelope(7, "nobody")).await.is_ok());
        assert_eq!(fanout.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_loses_overwritten_envelopes() {
        // テスト項目: 容量を超えて遅れた購読者は上書きされた封筒を失い、残りから再開する
        // given (前提条件):
        let fanout = BroadcastFanout::with_capacity(2);
        let mut subscription = fanout.subscribe();

        // when (操作): 容量を超えて発行
        for i in 1..=4 {
            fanout.publish(envelope(i, "x")).await.unwrap();
        }

        // then (期待する結果): 1, 2 は失われ、直近の 2 件だけ受け取れる
        assert_eq!(subscription.next().await.unwrap().room_id, RoomId::new(3).unwrap());
        assert_eq!(subscription.next().await.unwrap().room_id, RoomId::new(4).unwrap());
        drop(fanout);
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn test_subscription_ends_when_transport_dropped() {
        // テスト項目: 送信側が破棄されると購読ストリームは終了する
        let fanout = BroadcastFanout::new();
        let mut subscription = fanout.subscribe();

        drop(fanout);

        assert!(subscription.next().await.is_none());
    }
}
