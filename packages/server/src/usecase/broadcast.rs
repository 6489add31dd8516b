//! Broadcast Engine
//!
//! ルーム宛てのイベントを、このプロセスに接続しているメンバーへ直接配信し、
//! 同時にファンアウト経由で他のプロセスへ発行します。
//! 自プロセスが発行した封筒はファンアウトから戻ってきても無視するため、
//! ローカルのメンバーに二重配信されることはありません。

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::domain::{
    ConnectionId, FanoutTransport, MembershipRepository, MessagePusher, NodeId, OutboundEvent,
    RoomEnvelope, RoomId,
};

pub struct RoomBroadcaster {
    memberships: Arc<dyn MembershipRepository>,
    pusher: Arc<dyn MessagePusher>,
    fanout: Arc<dyn FanoutTransport>,
    node_id: NodeId,
}

impl RoomBroadcaster {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        pusher: Arc<dyn MessagePusher>,
        fanout: Arc<dyn FanoutTransport>,
        node_id: NodeId,
    ) -> Self {
        Self {
            memberships,
            pusher,
            fanout,
            node_id,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Deliver an event to every member of a room, on every process.
    ///
    /// Publish failures are logged only.
    pub async fn to_room(
        &self,
        room_id: RoomId,
        event: OutboundEvent,
        exclude: Option<ConnectionId>,
    ) {
        let envelope = RoomEnvelope {
            origin: self.node_id.clone(),
            room_id,
            exclude,
            event,
        };
        self.deliver_local(&envelope).await;

        let name = envelope.event.name();
        if let Err(e) = self.fanout.publish(envelope).await {
            tracing::warn!("Failed to publish '{}' for room {}: {}", name, room_id, e);
        }
    }

    /// Deliver an event to a single local connection. Failures are logged only.
    pub async fn send_to(&self, connection_id: &ConnectionId, event: &OutboundEvent) {
        if let Err(e) = self.pusher.push_to(connection_id, event).await {
            tracing::debug!(
                "Could not deliver '{}' to '{}': {}",
                event.name(),
                connection_id,
                e
            );
        }
    }

    /// Deliver an envelope to this process's members of its room
    pub async fn deliver_local(&self, envelope: &RoomEnvelope) {
        let targets: Vec<ConnectionId> = self
            .memberships
            .members_of(envelope.room_id)
            .into_iter()
            .filter(|member| envelope.exclude.as_ref() != Some(member))
            .collect();
        if let Err(e) = self.pusher.broadcast(&targets, &envelope.event).await {
            tracing::warn!(
                "Failed to broadcast '{}' to room {}: {}",
                envelope.event.name(),
                envelope.room_id,
                e
            );
        }
    }

    /// Subscribe to the fan-out transport and deliver envelopes published by
    /// other processes. Runs until the transport closes.
    pub fn spawn_fanout_listener(self: Arc<Self>) -> JoinHandle<()> {
        let mut subscription = self.fanout.subscribe();
        tokio::spawn(async move {
            while let Some(envelope) = subscription.next().await {
                if envelope.origin == self.node_id {
                    continue;
                }
                tracing::debug!(
                    "Fan-out '{}' for room {} from {}",
                    envelope.event.name(),
                    envelope.room_id,
                    envelope.origin
                );
                self.deliver_local(&envelope).await;
            }
            tracing::info!("Fan-out subscription closed");
        })
    }
}
