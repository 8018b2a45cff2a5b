//! Registry of open relay rooms

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use super::{GameRoom, RoomHandle};

/// Registry of all open rooms
pub struct RoomRegistry {
    rooms: Arc<DashMap<Uuid, RoomHandle>>,
    max_clients: usize,
}

impl RoomRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            max_clients: max_clients.max(1),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<RoomHandle> {
        self.rooms.get(id).map(|r| r.value().clone())
    }

    pub fn active_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn total_players(&self) -> usize {
        self.rooms.iter().map(|r| r.value().player_count()).sum()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    /// Reserve a slot in the first room with space, opening a new room if all are
    /// full. Must be called from within a tokio runtime.
    pub fn join_or_create(&self) -> RoomHandle {
        let existing = self
            .rooms
            .iter()
            .find(|entry| entry.value().try_reserve())
            .map(|entry| entry.value().clone());
        if let Some(handle) = existing {
            return handle;
        }

        let id = Uuid::new_v4();
        let (room, handle) = GameRoom::new(id, self.max_clients);
        // Fresh room with capacity >= 1, nobody else can see it yet
        handle.try_reserve();
        self.rooms.insert(id, handle.clone());
        info!(room_id = %id, rooms = self.rooms.len(), "Opened new room");

        let rooms = self.rooms.clone();
        tokio::spawn(async move {
            room.run().await;
            rooms.remove(&id);
        });

        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomCommand;

    #[tokio::test]
    async fn full_room_spills_into_a_new_one() {
        let registry = RoomRegistry::new(2);
        let first = registry.join_or_create();
        let second = registry.join_or_create();
        assert_eq!(first.id, second.id);

        let third = registry.join_or_create();
        assert_ne!(third.id, first.id);
        assert_eq!(registry.active_rooms(), 2);
        assert_eq!(registry.total_players(), 3);
    }

    #[tokio::test]
    async fn empty_room_is_removed() {
        let registry = RoomRegistry::new(4);
        let handle = registry.join_or_create();
        let session_id = Uuid::new_v4();

        handle
            .command_tx
            .send(RoomCommand::Join {
                session_id,
                vehicle: "ironclad".to_string(),
                health: 150,
            })
            .await
            .unwrap();
        handle
            .command_tx
            .send(RoomCommand::Leave { session_id })
            .await
            .unwrap();

        // The room task drops its receiver on close
        handle.command_tx.closed().await;
        for _ in 0..100 {
            if registry.active_rooms() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(registry.active_rooms(), 0);
        assert!(registry.get(&handle.id).is_none());
    }
}
