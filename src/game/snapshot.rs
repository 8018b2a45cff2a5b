//! Per-tick copy-out snapshots for rendering collaborators

use std::collections::HashSet;

use glam::Vec3;
use serde::Serialize;
use uuid::Uuid;

use super::catalog::{ProjectileKind, WeaponKind};
use super::combat::Projectile;
use super::vehicle::{DamageState, Tilt, VehicleInstance};

/// Render view of one live vehicle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleView {
    pub id: Uuid,
    pub vehicle_type: String,
    pub local: bool,
    pub position: Vec3,
    pub heading: f32,
    pub tilt: Tilt,
    pub damage_state: DamageState,
    /// Damage state changed during this tick
    pub transitioned: bool,
    pub drifting: bool,
    pub boosting: bool,
}

/// Render view of one active projectile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: Uuid,
    pub kind: ProjectileKind,
    pub weapon: WeaponKind,
    pub owner_id: Uuid,
    pub position: Vec3,
    pub spawn_time: u64,
    pub elapsed_ms: u64,
    /// 0 at spawn, 1 at expiry; drives fade/scale only
    pub decay: f32,
}

/// Local player HUD values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalHud {
    pub vehicle_id: Uuid,
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
    pub damage_state: DamageState,
    pub cooldown_remaining_ms: u64,
    pub speed: f32,
}

/// Everything a renderer may read after a tick. Owns its data; nothing borrows
/// simulation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub now: u64,
    /// Integrated (clamped) frame time
    pub dt_ms: u64,
    pub vehicles: Vec<VehicleView>,
    pub projectiles: Vec<ProjectileView>,
    pub local: LocalHud,
}

impl FrameSnapshot {
    pub fn vehicle(&self, id: Uuid) -> Option<&VehicleView> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

/// Builds frame snapshots and paces outbound pose updates
pub struct SnapshotBuilder {
    /// Ticks since the last pose update
    ticks_since_move: u32,
    /// Pose update interval in ticks
    move_interval: u32,
    /// Vehicles whose damage state changed this tick
    transitioned: HashSet<Uuid>,
}

impl SnapshotBuilder {
    pub fn new(move_interval: u32) -> Self {
        let move_interval = move_interval.max(1);
        Self {
            // First tick always sends
            ticks_since_move: move_interval - 1,
            move_interval,
            transitioned: HashSet::new(),
        }
    }

    /// Check if it's time to send a pose update
    pub fn should_send_move(&mut self) -> bool {
        self.ticks_since_move += 1;
        if self.ticks_since_move >= self.move_interval {
            self.ticks_since_move = 0;
            true
        } else {
            false
        }
    }

    /// Record a damage-state transition for the next snapshot
    pub fn mark_transition(&mut self, vehicle_id: Uuid) {
        self.transitioned.insert(vehicle_id);
    }

    /// Build the snapshot for this tick and reset per-tick flags
    pub fn build<'a>(
        &mut self,
        tick: u64,
        now: u64,
        dt_ms: u64,
        local: &'a VehicleInstance,
        remotes: impl Iterator<Item = &'a VehicleInstance>,
        projectiles: impl Iterator<Item = &'a Projectile>,
    ) -> FrameSnapshot {
        let vehicles = std::iter::once((local, true))
            .chain(remotes.map(|v| (v, false)))
            .filter(|(v, _)| v.alive)
            .map(|(v, is_local)| VehicleView {
                id: v.id,
                vehicle_type: v.type_id().to_string(),
                local: is_local,
                position: v.position,
                heading: v.heading,
                tilt: v.tilt,
                damage_state: v.damage_state,
                transitioned: self.transitioned.contains(&v.id),
                drifting: v.drifting,
                boosting: v.boosting,
            })
            .collect();

        let projectiles = projectiles
            .map(|p| ProjectileView {
                id: p.id,
                kind: p.kind,
                weapon: p.weapon,
                owner_id: p.owner_id,
                position: p.position,
                spawn_time: p.spawn_time,
                elapsed_ms: p.elapsed_ms(now),
                decay: p.decay(now),
            })
            .collect();

        self.transitioned.clear();

        FrameSnapshot {
            tick,
            now,
            dt_ms,
            vehicles,
            projectiles,
            local: LocalHud {
                vehicle_id: local.id,
                health: local.health,
                max_health: local.vehicle_type.max_health,
                alive: local.alive,
                damage_state: local.damage_state,
                cooldown_remaining_ms: local.cooldown_remaining_ms(now),
                speed: local.current_speed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::VehicleCatalog;
    use crate::game::combat::WeaponSystem;

    fn vehicle(type_id: &str) -> VehicleInstance {
        let catalog = VehicleCatalog::builtin().unwrap();
        VehicleInstance::spawn(&catalog, type_id, Uuid::new_v4(), Vec3::ZERO, 0.0).unwrap()
    }

    #[test]
    fn move_cadence_follows_interval() {
        let mut builder = SnapshotBuilder::new(3);
        let sent: Vec<bool> = (0..7).map(|_| builder.should_send_move()).collect();
        assert_eq!(sent, vec![true, false, false, true, false, false, true]);

        let mut every_tick = SnapshotBuilder::new(1);
        assert!((0..5).all(|_| every_tick.should_send_move()));
    }

    #[test]
    fn snapshot_lists_live_vehicles_only() {
        let mut builder = SnapshotBuilder::new(1);
        let local = vehicle("razorback");
        let alive = vehicle("ironclad");
        let mut wreck = vehicle("scorpion");
        wreck.alive = false;
        let remotes = [alive.clone(), wreck];

        let snapshot = builder.build(1, 0, 0, &local, remotes.iter(), std::iter::empty());
        assert_eq!(snapshot.vehicles.len(), 2);
        assert!(snapshot.vehicle(local.id).unwrap().local);
        assert!(!snapshot.vehicle(alive.id).unwrap().local);
        assert_eq!(snapshot.local.max_health, 80);
    }

    #[test]
    fn transition_flag_lasts_one_snapshot() {
        let mut builder = SnapshotBuilder::new(1);
        let local = vehicle("razorback");
        builder.mark_transition(local.id);

        let first = builder.build(1, 0, 0, &local, std::iter::empty(), std::iter::empty());
        assert!(first.vehicles[0].transitioned);
        let second = builder.build(2, 16, 16, &local, std::iter::empty(), std::iter::empty());
        assert!(!second.vehicles[0].transitioned);
    }

    #[test]
    fn projectile_view_reports_elapsed_and_hud_cooldown() {
        let mut builder = SnapshotBuilder::new(1);
        let mut local = vehicle("junkyard_king");
        let flames = WeaponSystem::try_fire(&mut local, 1_000).projectiles;

        let snapshot = builder.build(1, 1_750, 16, &local, std::iter::empty(), flames.iter());
        assert_eq!(snapshot.projectiles.len(), 2);
        assert_eq!(snapshot.projectiles[0].elapsed_ms, 750);
        assert!((snapshot.projectiles[0].decay - 0.5).abs() < 1e-6);
        assert_eq!(snapshot.local.cooldown_remaining_ms, 250);
    }
}
