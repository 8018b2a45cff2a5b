//! Multiplayer relay room - thin advisory pass-through between game clients

pub mod registry;
pub mod state;

pub use registry::RoomRegistry;
pub use state::{Audience, RoomEvent, RoomState};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ws::protocol::ClientMsg;

/// Player count value marking a room that has shut down
const CLOSED: usize = usize::MAX;

/// Commands sent from WebSocket sessions into a room task
#[derive(Debug, Clone)]
pub enum RoomCommand {
    /// Enter the room. The slot must already be reserved via `RoomHandle::try_reserve`.
    Join {
        session_id: Uuid,
        vehicle: String,
        health: u32,
    },
    Message {
        session_id: Uuid,
        msg: ClientMsg,
    },
    Leave {
        session_id: Uuid,
    },
}

/// Handle to a running room
#[derive(Clone)]
pub struct RoomHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<RoomCommand>,
    pub events_tx: broadcast::Sender<RoomEvent>,
    player_count: Arc<AtomicUsize>,
    max_clients: usize,
}

impl RoomHandle {
    pub fn player_count(&self) -> usize {
        match self.player_count.load(Ordering::Acquire) {
            CLOSED => 0,
            n => n,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.player_count.load(Ordering::Acquire) == CLOSED
    }

    /// Claim a slot. Fails when the room is full or has shut down.
    pub fn try_reserve(&self) -> bool {
        self.player_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                if n == CLOSED || n >= self.max_clients {
                    None
                } else {
                    Some(n + 1)
                }
            })
            .is_ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events_tx.subscribe()
    }
}

/// The relay room task
pub struct GameRoom {
    state: RoomState,
    command_rx: mpsc::Receiver<RoomCommand>,
    events_tx: broadcast::Sender<RoomEvent>,
    player_count: Arc<AtomicUsize>,
}

impl GameRoom {
    /// Create a new room
    pub fn new(id: Uuid, max_clients: usize) -> (Self, RoomHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (events_tx, _) = broadcast::channel(256);
        let player_count = Arc::new(AtomicUsize::new(0));

        let handle = RoomHandle {
            id,
            command_tx,
            events_tx: events_tx.clone(),
            player_count: player_count.clone(),
            max_clients,
        };

        let room = Self {
            state: RoomState::new(id),
            command_rx,
            events_tx,
            player_count,
        };

        (room, handle)
    }

    /// Process commands until the last player leaves
    pub async fn run(mut self) {
        info!(room_id = %self.state.id, "Room opened");

        while let Some(command) = self.command_rx.recv().await {
            let before = self.state.len();
            let events = self.apply(command);

            for event in events {
                // No subscribers is fine; everyone may have disconnected
                let _ = self.events_tx.send(event);
            }

            let someone_left = self.state.len() < before;
            if someone_left && self.state.is_empty() && self.try_close() {
                break;
            }
        }

        info!(room_id = %self.state.id, "Room closed");
    }

    fn apply(&mut self, command: RoomCommand) -> Vec<RoomEvent> {
        match command {
            RoomCommand::Join {
                session_id,
                vehicle,
                health,
            } => self.state.join(session_id, vehicle, health),
            RoomCommand::Message { session_id, msg } => {
                let was_present = self.state.player(&session_id).is_some();
                let events = self.state.handle(session_id, msg);
                if was_present && self.state.player(&session_id).is_none() {
                    self.release_slot();
                }
                events
            }
            RoomCommand::Leave { session_id } => {
                let events = self.state.leave(session_id);
                if !events.is_empty() {
                    self.release_slot();
                }
                events
            }
        }
    }

    fn release_slot(&self) {
        let _ = self
            .player_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                if n == CLOSED || n == 0 {
                    None
                } else {
                    Some(n - 1)
                }
            });
    }

    /// Shut down only if no slot was reserved meanwhile
    fn try_close(&self) -> bool {
        let closed = self
            .player_count
            .compare_exchange(0, CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !closed {
            debug!(room_id = %self.state.id, "Room emptied but a slot is reserved, staying open");
        }
        closed
    }
}
