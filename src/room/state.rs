//! Room state and message handling (pure; the task in `mod.rs` drives it)

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ws::protocol::{ClientMsg, PlayerInfo, Point, ServerMsg};

/// Ammo granted on join and on every reload
pub const FULL_AMMO: u32 = 30;

/// Where players appear on join
pub const SPAWN_POINT: Point = Point {
    x: 0.0,
    y: 2.0,
    z: 0.0,
};

/// Who receives a room event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    Except(Uuid),
    Only(Uuid),
}

impl Audience {
    pub fn includes(&self, session_id: Uuid) -> bool {
        match *self {
            Audience::All => true,
            Audience::Except(excluded) => excluded != session_id,
            Audience::Only(target) => target == session_id,
        }
    }
}

/// A message addressed to part of the room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    pub audience: Audience,
    pub msg: ServerMsg,
}

impl RoomEvent {
    fn to(audience: Audience, msg: ServerMsg) -> Self {
        Self { audience, msg }
    }
}

/// Advisory per-player record held by the room
#[derive(Debug, Clone)]
pub struct RoomPlayer {
    pub id: Uuid,
    pub vehicle: String,
    pub position: Point,
    pub rotation: Point,
    pub health: u32,
    pub ammo: u32,
    pub is_dead: bool,
}

impl RoomPlayer {
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            vehicle: self.vehicle.clone(),
            position: self.position,
            rotation: self.rotation,
            health: self.health,
            ammo: self.ammo,
            is_dead: self.is_dead,
        }
    }
}

/// Room state (owned by the room task)
pub struct RoomState {
    pub id: Uuid,
    players: HashMap<Uuid, RoomPlayer>,
}

impl RoomState {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            players: HashMap::new(),
        }
    }

    pub fn player(&self, id: &Uuid) -> Option<&RoomPlayer> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Add a player with an already validated vehicle and its max health
    pub fn join(&mut self, session_id: Uuid, vehicle: String, health: u32) -> Vec<RoomEvent> {
        if self.players.contains_key(&session_id) {
            return vec![RoomEvent::to(
                Audience::Only(session_id),
                ServerMsg::error("already_joined", "Session is already in this room"),
            )];
        }

        let player = RoomPlayer {
            id: session_id,
            vehicle,
            position: SPAWN_POINT,
            rotation: Point::default(),
            health,
            ammo: FULL_AMMO,
            is_dead: false,
        };
        let others: Vec<PlayerInfo> = self.players.values().map(RoomPlayer::info).collect();
        let info = player.info();
        self.players.insert(session_id, player);

        info!(room_id = %self.id, session_id = %session_id, vehicle = %info.vehicle, "Player joined room");

        vec![
            RoomEvent::to(
                Audience::Only(session_id),
                ServerMsg::Joined {
                    room_id: self.id,
                    session_id,
                    players: others,
                },
            ),
            RoomEvent::to(Audience::Except(session_id), ServerMsg::PlayerJoined { player: info }),
        ]
    }

    pub fn leave(&mut self, session_id: Uuid) -> Vec<RoomEvent> {
        match self.players.remove(&session_id) {
            Some(_) => {
                info!(room_id = %self.id, session_id = %session_id, "Player left room");
                vec![RoomEvent::to(
                    Audience::All,
                    ServerMsg::PlayerLeft {
                        player_id: session_id,
                    },
                )]
            }
            None => Vec::new(),
        }
    }

    /// Apply one client message from a joined session
    pub fn handle(&mut self, session_id: Uuid, msg: ClientMsg) -> Vec<RoomEvent> {
        if let ClientMsg::Ping { t } = msg {
            return vec![RoomEvent::to(Audience::Only(session_id), ServerMsg::Pong { t })];
        }
        if let ClientMsg::Leave = msg {
            return self.leave(session_id);
        }

        let Some(player) = self.players.get_mut(&session_id) else {
            warn!(room_id = %self.id, session_id = %session_id, "Message from session not in room");
            return Vec::new();
        };

        match msg {
            ClientMsg::PlayerMove {
                x,
                y,
                z,
                rotation_x,
                rotation_y,
                rotation_z,
            } => {
                player.position = Point::new(x, y, z);
                player.rotation = Point::new(rotation_x, rotation_y, rotation_z);
                vec![RoomEvent::to(
                    Audience::Except(session_id),
                    ServerMsg::PlayerMoved {
                        player_id: session_id,
                        x,
                        y,
                        z,
                        rotation_x,
                        rotation_y,
                        rotation_z,
                    },
                )]
            }

            ClientMsg::PlayerShoot { position, rotation } => {
                if player.is_dead || player.ammo == 0 {
                    debug!(session_id = %session_id, ammo = player.ammo, "Shot refused");
                    return Vec::new();
                }
                player.ammo -= 1;
                player.position = position;
                player.rotation = rotation;
                vec![RoomEvent::to(
                    Audience::Except(session_id),
                    ServerMsg::PlayerShoot {
                        player_id: session_id,
                        position,
                        rotation,
                    },
                )]
            }

            ClientMsg::PlayerHit { target_id, damage } => self.hit(session_id, target_id, damage),

            ClientMsg::WeaponReload => {
                if player.is_dead {
                    return Vec::new();
                }
                player.ammo = FULL_AMMO;
                vec![RoomEvent::to(
                    Audience::All,
                    ServerMsg::WeaponReload {
                        player_id: session_id,
                    },
                )]
            }

            ClientMsg::Join { .. } => vec![RoomEvent::to(
                Audience::Only(session_id),
                ServerMsg::error("already_joined", "Session is already in this room"),
            )],

            ClientMsg::Ping { .. } | ClientMsg::Leave => Vec::new(),
        }
    }

    fn hit(&mut self, attacker_id: Uuid, target_id: Uuid, damage: u32) -> Vec<RoomEvent> {
        let Some(target) = self.players.get_mut(&target_id) else {
            debug!(target_id = %target_id, "Hit on unknown player");
            return Vec::new();
        };
        if target.is_dead {
            return Vec::new();
        }

        target.health = target.health.saturating_sub(damage);
        let mut events = vec![RoomEvent::to(
            Audience::All,
            ServerMsg::PlayerDamaged {
                player_id: target_id,
                health: target.health,
                attacker_id,
            },
        )];

        if target.health == 0 {
            target.is_dead = true;
            info!(room_id = %self.id, player_id = %target_id, killer_id = %attacker_id, "Player destroyed");
            events.push(RoomEvent::to(
                Audience::All,
                ServerMsg::PlayerDeath {
                    player_id: target_id,
                    killer_id: attacker_id,
                },
            ));
        }
        events
    }
}
