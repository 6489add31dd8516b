//! InMemory Membership Repository 実装
//!
//! ルーム参加状態は揮発データのため、プロセス内のみで保持します。
//! ルーム単位・接続単位のシャード化されたマップを使い、
//! 混雑したルームが他のルームの操作をブロックしないようにしています。

use std::collections::HashSet;

use dashmap::DashMap;

use crate::domain::{ConnectionId, MembershipRepository, RoomId};

/// インメモリ Membership Repository 実装
#[derive(Default)]
pub struct InMemoryMembershipRepository {
    /// room_id -> member connections
    rooms: DashMap<RoomId, HashSet<ConnectionId>>,
    /// connection_id -> joined rooms (reverse index for disconnect)
    connections: DashMap<ConnectionId, HashSet<RoomId>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove_from_room(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        let mut removed = false;
        self.rooms.remove_if_mut(&room_id, |_, members| {
            removed = members.remove(connection_id);
            members.is_empty()
        });
        removed
    }
}

impl MembershipRepository for InMemoryMembershipRepository {
    fn join(&self, connection_id: &ConnectionId, room_id: RoomId) -> Vec<ConnectionId> {
        self.connections
            .entry(connection_id.clone())
            .or_default()
            .insert(room_id);

        let mut members = self.rooms.entry(room_id).or_default();
        members.insert(connection_id.clone());
        members.iter().cloned().collect()
    }

    fn leave(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        self.connections.remove_if_mut(connection_id, |_, rooms| {
            rooms.remove(&room_id);
            rooms.is_empty()
        });
        self.remove_from_room(connection_id, room_id)
    }

    fn members_of(&self, room_id: RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(&room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn is_member(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        self.rooms
            .get(&room_id)
            .is_some_and(|members| members.contains(connection_id))
    }

    fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .connections
            .get(connection_id)
            .map(|rooms| rooms.iter().copied().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    fn drop_connection(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .connections
            .remove(connection_id)
            .map(|(_, rooms)| rooms.into_iter().collect())
            .unwrap_or_default();
        rooms.retain(|room_id| self.remove_from_room(connection_id, *room_id));
        rooms.sort();
        rooms
    }
}
