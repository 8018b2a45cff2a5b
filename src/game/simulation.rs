//! Simulation clock - owns all vehicle and projectile state and advances it once per
//! rendered frame in a fixed order

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec3;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::util::time::{clamped_delta_ms, MAX_FRAME_DELTA_MS};
use crate::ws::protocol::{ClientMsg, PlayerInfo, Point, ServerMsg};

use super::catalog::{CatalogError, FireMode, VehicleCatalog};
use super::combat::{HitResult, HitTarget, Projectile, WeaponSystem};
use super::damage::{DamageOutcome, DamageStateMachine};
use super::physics::KinematicModel;
use super::snapshot::{FrameSnapshot, SnapshotBuilder};
use super::sync::{SyncBoundary, SyncStats, TransportEndpoint};
use super::vehicle::{Tilt, VehicleInstance};
use super::InputState;

/// Simulation tuning that is not per-vehicle
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Longest frame integrated in one tick
    pub max_frame_delta_ms: u64,
    /// Ticks between outbound pose updates
    pub move_send_interval: u32,
    /// Bounded queue size in each direction of the sync boundary
    pub outbound_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            move_send_interval: 1,
            outbound_capacity: 256,
        }
    }
}

/// Simulation errors
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Cannot create vehicle: {0}")]
    Vehicle(#[from] CatalogError),
}

/// The local simulation: one locally driven vehicle plus mirrors of remote players
pub struct Simulation {
    catalog: Arc<VehicleCatalog>,
    config: SimConfig,
    local: VehicleInstance,
    /// Keyed by id so snapshots list mirrors in a stable order
    remotes: BTreeMap<Uuid, VehicleInstance>,
    /// Projectiles fired locally; the only ones resolved against hitboxes
    projectiles: Vec<Projectile>,
    /// Replays of remote shots, advanced for rendering only
    remote_projectiles: Vec<Projectile>,
    sync: SyncBoundary,
    snapshots: SnapshotBuilder,
    tick: u64,
    last_tick_at: Option<u64>,
    fire_held: bool,
    reload_pending: bool,
}

impl Simulation {
    /// Create a simulation for the given vehicle type. Unknown types are rejected.
    pub fn new(
        catalog: Arc<VehicleCatalog>,
        vehicle_type: &str,
        config: SimConfig,
        mut sync: SyncBoundary,
    ) -> Result<Self, SimError> {
        let local = VehicleInstance::spawn(&catalog, vehicle_type, Uuid::new_v4(), Vec3::ZERO, 0.0)?;

        info!(vehicle_id = %local.id, vehicle_type, "Simulation created");
        sync.send(ClientMsg::Join {
            vehicle: vehicle_type.to_string(),
        });

        Ok(Self {
            catalog,
            snapshots: SnapshotBuilder::new(config.move_send_interval),
            config,
            local,
            remotes: BTreeMap::new(),
            projectiles: Vec::new(),
            remote_projectiles: Vec::new(),
            sync,
            tick: 0,
            last_tick_at: None,
            fire_held: false,
            reload_pending: false,
        })
    }

    /// Create a simulation together with the transport end of its sync boundary
    pub fn connect(
        catalog: Arc<VehicleCatalog>,
        vehicle_type: &str,
        config: SimConfig,
    ) -> Result<(Self, TransportEndpoint), SimError> {
        let (sync, transport) = SyncBoundary::connect(config.outbound_capacity);
        let simulation = Self::new(catalog, vehicle_type, config, sync)?;
        Ok((simulation, transport))
    }

    /// Advance one frame. `now` is the frame timestamp in milliseconds.
    pub fn tick(&mut self, now: u64, input: &InputState) -> FrameSnapshot {
        // 1. Frame time, clamped after stalls; the first tick integrates nothing
        let dt_ms = match self.last_tick_at {
            Some(previous) => clamped_delta_ms(previous, now, self.config.max_frame_delta_ms),
            None => 0,
        };
        self.last_tick_at = Some(self.last_tick_at.map_or(now, |previous| previous.max(now)));
        self.tick += 1;
        let dt = dt_ms as f32 / 1000.0;

        // 1b. Latest remote state before anything is hit-tested against it
        for msg in self.sync.drain() {
            self.apply_inbound(msg, now);
        }

        // 2. Local kinematics
        KinematicModel::step(&mut self.local, input, dt);

        // 3. Projectiles and hits
        self.update_projectiles(dt, now);

        // 4. Weapon
        self.update_weapon(input, now);

        // 5. Outbound pose and render snapshot
        if self.snapshots.should_send_move() && self.local.alive {
            let msg = self.move_msg();
            self.sync.send(msg);
        }

        self.snapshots.build(
            self.tick,
            now,
            dt_ms,
            &self.local,
            self.remotes.values(),
            self.projectiles.iter().chain(self.remote_projectiles.iter()),
        )
    }

    fn update_projectiles(&mut self, dt: f32, now: u64) {
        let advanced = WeaponSystem::advance_projectiles(std::mem::take(&mut self.projectiles), dt, now);
        self.projectiles = advanced.remaining;

        let targets: Vec<HitTarget> = self
            .remotes
            .values()
            .filter(|v| v.alive)
            .map(HitTarget::from)
            .collect();

        let mut hits = WeaponSystem::resolve_hits(&mut self.projectiles, &targets);
        // A shell can strike a vehicle on its final stretch; the rest burst on the ground
        let mut landed = advanced.grounded;
        hits.extend(WeaponSystem::resolve_hits(&mut landed, &targets));
        for shell in &landed {
            hits.extend(WeaponSystem::splash(shell, shell.position, &targets, None));
        }
        for hit in hits {
            self.apply_hit(hit);
        }

        let replayed =
            WeaponSystem::advance_projectiles(std::mem::take(&mut self.remote_projectiles), dt, now);
        self.remote_projectiles = replayed.remaining;
    }

    fn apply_hit(&mut self, hit: HitResult) {
        let Some(target) = self.remotes.get_mut(&hit.target_id) else {
            return;
        };
        if !target.alive {
            return;
        }

        let outcome = DamageStateMachine::apply_damage(target, hit.damage);
        if outcome.transitioned {
            self.snapshots.mark_transition(hit.target_id);
        }
        debug!(
            target_id = %hit.target_id,
            damage = hit.damage,
            splash = hit.splash,
            "Projectile hit"
        );

        self.sync.send(ClientMsg::PlayerHit {
            target_id: hit.target_id,
            damage: hit.damage,
        });
    }

    fn update_weapon(&mut self, input: &InputState, now: u64) {
        let pressed = input.fire && !self.fire_held;
        self.fire_held = input.fire;

        if self.reload_pending && self.local.alive && now >= self.local.weapon_cooldown_until {
            self.reload_pending = false;
            self.sync.send(ClientMsg::WeaponReload);
        }

        let wants_fire = match self.local.vehicle_type.weapon.fire_mode {
            FireMode::SingleShot => pressed,
            FireMode::Sustained => input.fire,
        };
        if !wants_fire {
            return;
        }

        let result = WeaponSystem::try_fire(&mut self.local, now);
        if result.fired {
            self.reload_pending = true;
            self.projectiles.extend(result.projectiles);
            self.sync.send(ClientMsg::PlayerShoot {
                position: self.local.position.into(),
                rotation: self.local_rotation(),
            });
        }
    }

    fn local_rotation(&self) -> Point {
        Point::new(self.local.tilt.x, self.local.heading, self.local.tilt.z)
    }

    fn move_msg(&self) -> ClientMsg {
        let rotation = self.local_rotation();
        ClientMsg::PlayerMove {
            x: self.local.position.x,
            y: self.local.position.y,
            z: self.local.position.z,
            rotation_x: rotation.x,
            rotation_y: rotation.y,
            rotation_z: rotation.z,
        }
    }

    fn apply_inbound(&mut self, msg: ServerMsg, now: u64) {
        match msg {
            ServerMsg::Welcome { session_id, .. } => {
                debug!(session_id = %session_id, "Transport connected");
            }
            ServerMsg::Joined {
                room_id,
                session_id,
                players,
            } => {
                self.adopt_session(session_id);
                info!(room_id = %room_id, session_id = %session_id, players = players.len(), "Joined room");
                for player in players {
                    self.add_remote(player);
                }
            }
            ServerMsg::PlayerJoined { player } => self.add_remote(player),
            ServerMsg::PlayerLeft { player_id } => {
                if self.remotes.remove(&player_id).is_some() {
                    info!(player_id = %player_id, "Remote player left");
                }
            }
            ServerMsg::PlayerMoved {
                player_id,
                x,
                z,
                rotation_x,
                rotation_y,
                rotation_z,
                ..
            } => {
                if player_id == self.local.id {
                    return;
                }
                match self.remotes.get_mut(&player_id) {
                    Some(mirror) => apply_pose(
                        mirror,
                        Vec3::new(x, 0.0, z),
                        Point::new(rotation_x, rotation_y, rotation_z),
                    ),
                    None => warn!(player_id = %player_id, "Move for unknown remote vehicle"),
                }
            }
            ServerMsg::PlayerShoot {
                player_id,
                position,
                rotation,
            } => {
                let Some(mirror) = self.remotes.get_mut(&player_id) else {
                    warn!(player_id = %player_id, "Shot from unknown remote vehicle");
                    return;
                };
                apply_pose(mirror, position.into(), rotation);
                if mirror.alive {
                    let volley = WeaponSystem::spawn_volley(mirror, now);
                    self.remote_projectiles.extend(volley);
                }
            }
            ServerMsg::PlayerDamaged {
                player_id,
                health,
                attacker_id,
            } => {
                debug!(player_id = %player_id, attacker_id = %attacker_id, health, "Damage reported");
                self.sync_health(player_id, health);
            }
            ServerMsg::PlayerDeath {
                player_id,
                killer_id,
            } => {
                info!(player_id = %player_id, killer_id = %killer_id, "Player destroyed");
                self.sync_health(player_id, 0);
            }
            ServerMsg::WeaponReload { player_id } => {
                debug!(player_id = %player_id, "Remote weapon reloaded");
            }
            ServerMsg::Error { code, message } => {
                warn!(code = %code, message = %message, "Room reported an error");
            }
            ServerMsg::Pong { t } => debug!(t, "Pong"),
        }
    }

    /// The room assigns our identity on join
    fn adopt_session(&mut self, session_id: Uuid) {
        if self.local.id == session_id {
            return;
        }
        self.remotes.remove(&session_id);
        for projectile in &mut self.projectiles {
            projectile.owner_id = session_id;
        }
        self.local.id = session_id;
    }

    fn add_remote(&mut self, player: PlayerInfo) {
        if player.id == self.local.id {
            return;
        }

        let mut mirror = match VehicleInstance::spawn(
            &self.catalog,
            &player.vehicle,
            player.id,
            player.position.into(),
            player.rotation.y,
        ) {
            Ok(mirror) => mirror,
            Err(e) => {
                warn!(player_id = %player.id, vehicle = %player.vehicle, error = %e, "Rejected remote player");
                return;
            }
        };
        mirror.tilt = Tilt {
            x: player.rotation.x,
            z: player.rotation.z,
        };
        let health = if player.is_dead { 0 } else { player.health };
        DamageStateMachine::sync_health(&mut mirror, health);

        info!(player_id = %player.id, vehicle = %player.vehicle, "Remote player mirrored");
        self.remotes.insert(player.id, mirror);
    }

    fn sync_health(&mut self, player_id: Uuid, health: u32) -> Option<DamageOutcome> {
        let vehicle = if player_id == self.local.id {
            &mut self.local
        } else {
            self.remotes.get_mut(&player_id)?
        };
        let outcome = DamageStateMachine::sync_health(vehicle, health);
        if outcome.transitioned {
            self.snapshots.mark_transition(player_id);
        }
        Some(outcome)
    }

    /// Announce departure to the room
    pub fn leave(&mut self) {
        self.sync.send(ClientMsg::Leave);
    }

    pub fn local(&self) -> &VehicleInstance {
        &self.local
    }

    pub fn remote(&self, id: &Uuid) -> Option<&VehicleInstance> {
        self.remotes.get(id)
    }

    pub fn remote_count(&self) -> usize {
        self.remotes.len()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn sync_stats(&self) -> SyncStats {
        self.sync.stats()
    }

    pub fn catalog(&self) -> &VehicleCatalog {
        &self.catalog
    }
}

/// Overwrite a mirror's pose from relayed state; mirrors are never simulated
fn apply_pose(mirror: &mut VehicleInstance, position: Vec3, rotation: Point) {
    mirror.position = Vec3::new(position.x, 0.0, position.z);
    mirror.heading = rotation.y;
    mirror.tilt = Tilt {
        x: rotation.x,
        z: rotation.z,
    };
}
