//! WebSocket protocol message definitions
//! These are the wire types between a game client and the relay room

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Point or Euler rotation on the wire (`{x, y, z}`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for Point {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point> for Vec3 {
    fn from(p: Point) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Enter a room with the selected vehicle
    Join {
        /// Vehicle catalog id
        vehicle: String,
    },

    /// Pose update, sent at render-loop cadence
    #[serde(rename_all = "camelCase")]
    PlayerMove {
        x: f32,
        y: f32,
        z: f32,
        rotation_x: f32,
        rotation_y: f32,
        rotation_z: f32,
    },

    /// Weapon fired
    PlayerShoot { position: Point, rotation: Point },

    /// A locally simulated projectile struck another player
    #[serde(rename_all = "camelCase")]
    PlayerHit { target_id: Uuid, damage: u32 },

    /// Weapon came off cooldown
    WeaponReload,

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },

    /// Leave the room
    Leave,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Welcome message after connection
    #[serde(rename_all = "camelCase")]
    Welcome { session_id: Uuid, server_time: u64 },

    /// Confirmation of room join with everyone already present
    #[serde(rename_all = "camelCase")]
    Joined {
        room_id: Uuid,
        session_id: Uuid,
        players: Vec<PlayerInfo>,
    },

    /// Another player joined the room
    PlayerJoined { player: PlayerInfo },

    /// Player left the room
    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: Uuid },

    /// Relayed pose update
    #[serde(rename_all = "camelCase")]
    PlayerMoved {
        player_id: Uuid,
        x: f32,
        y: f32,
        z: f32,
        rotation_x: f32,
        rotation_y: f32,
        rotation_z: f32,
    },

    /// Relayed shot (never echoed to the shooter)
    #[serde(rename_all = "camelCase")]
    PlayerShoot {
        player_id: Uuid,
        position: Point,
        rotation: Point,
    },

    /// Health after a reported hit
    #[serde(rename_all = "camelCase")]
    PlayerDamaged {
        player_id: Uuid,
        health: u32,
        attacker_id: Uuid,
    },

    /// Player destroyed
    #[serde(rename_all = "camelCase")]
    PlayerDeath { player_id: Uuid, killer_id: Uuid },

    /// Player's weapon reloaded
    #[serde(rename_all = "camelCase")]
    WeaponReload { player_id: Uuid },

    /// Error message
    Error { code: String, message: String },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

impl ServerMsg {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Player info for join/roster messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: Uuid,
    /// Vehicle catalog id
    pub vehicle: String,
    pub position: Point,
    pub rotation: Point,
    pub health: u32,
    pub ammo: u32,
    pub is_dead: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_use_camel_case_wire_names() {
        let msg = ClientMsg::PlayerMove {
            x: 1.0,
            y: 0.0,
            z: -2.0,
            rotation_x: 0.1,
            rotation_y: 1.5,
            rotation_z: 0.0,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "playerMove");
        assert_eq!(value["rotationY"], json!(1.5));

        let reload = serde_json::to_value(ClientMsg::WeaponReload).unwrap();
        assert_eq!(reload, json!({ "type": "weaponReload" }));
    }

    #[test]
    fn player_hit_parses_from_client_json() {
        let target = Uuid::new_v4();
        let raw = json!({ "type": "playerHit", "targetId": target, "damage": 20 }).to_string();
        let msg: ClientMsg = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            msg,
            ClientMsg::PlayerHit {
                target_id: target,
                damage: 20
            }
        );
    }

    #[test]
    fn shot_positions_are_objects() {
        let msg = ServerMsg::PlayerShoot {
            player_id: Uuid::nil(),
            position: Point::new(1.0, 2.0, 3.0),
            rotation: Point::default(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "playerShoot");
        assert_eq!(value["position"], json!({ "x": 1.0, "y": 2.0, "z": 3.0 }));
        assert!(value.get("playerId").is_some());
    }

    #[test]
    fn death_carries_killer() {
        let victim = Uuid::new_v4();
        let killer = Uuid::new_v4();
        let value = serde_json::to_value(ServerMsg::PlayerDeath {
            player_id: victim,
            killer_id: killer,
        })
        .unwrap();
        assert_eq!(value["type"], "playerDeath");
        assert_eq!(value["killerId"], json!(killer));
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"teleport"}"#).is_err());
    }
}
