//! Combat system - weapon firing, projectile flight, hit detection

use glam::{Vec2, Vec3};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::catalog::{ArcProfile, ProjectileKind, WeaponKind};
use super::vehicle::VehicleInstance;

/// Downward acceleration applied during the descent phase
pub const GRAVITY: f32 = -9.8;
/// Ballistic projectiles at or below this height are removed
pub const GROUND_CONTACT_HEIGHT: f32 = 0.0;

/// Active projectile owned by the simulation until it expires, lands or hits
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: Uuid,
    pub kind: ProjectileKind,
    pub weapon: WeaponKind,
    pub owner_id: Uuid,
    pub spawn_position: Vec3,
    pub position: Vec3,
    /// Position before the latest advance; hits are tested along the segment between
    pub previous_position: Vec3,
    /// Horizontal velocity plus, for ballistic kinds, the vertical launch component
    pub velocity: Vec3,
    pub spawn_time: u64,
    pub lifetime_ms: u64,
    pub damage: u32,
    pub splash_radius: Option<f32>,
    arc: ArcProfile,
    descending: bool,
}

/// Flight phase of a ballistic projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcPhase {
    Ascent,
    Apex,
    Descent,
}

impl Projectile {
    pub fn elapsed_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.spawn_time)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.elapsed_ms(now) >= self.lifetime_ms
    }

    /// Fade factor for rendering, 0 at spawn and 1 at expiry
    pub fn decay(&self, now: u64) -> f32 {
        (self.elapsed_ms(now) as f32 / self.lifetime_ms as f32).clamp(0.0, 1.0)
    }

    pub fn phase(&self, now: u64) -> ArcPhase {
        let elapsed = self.elapsed_ms(now);
        if elapsed < self.arc.ascent_ms {
            ArcPhase::Ascent
        } else if elapsed < self.arc.apex_end_ms {
            ArcPhase::Apex
        } else {
            ArcPhase::Descent
        }
    }

    /// Integrate one tick of flight
    fn advance(&mut self, dt: f32, now: u64) {
        self.previous_position = self.position;
        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;

        if self.kind == ProjectileKind::Beam {
            return;
        }

        match self.phase(now) {
            ArcPhase::Ascent => self.position.y += self.velocity.y * dt,
            ArcPhase::Apex => self.position.y += self.velocity.y * self.arc.apex_lift_factor * dt,
            ArcPhase::Descent => {
                if !self.descending {
                    // The shell tips over from a standstill
                    self.descending = true;
                    self.velocity.y = 0.0;
                }
                self.velocity.y += GRAVITY * self.arc.descent_gravity_factor * dt;
                self.position.y += self.velocity.y * dt;
            }
        }
    }

    fn is_grounded(&self) -> bool {
        self.kind == ProjectileKind::Ballistic && self.position.y <= GROUND_CONTACT_HEIGHT
    }

    /// Point on this tick's flight path nearest to `target` in the ground plane, and how
    /// far along the path it lies (0 at the previous position, 1 at the current one)
    fn closest_approach(&self, target: Vec3) -> (f32, Vec3) {
        let start = Vec2::new(self.previous_position.x, self.previous_position.z);
        let path = Vec2::new(self.position.x, self.position.z) - start;
        let to_target = Vec2::new(target.x, target.z) - start;

        let length_sq = path.length_squared();
        let t = if length_sq > 0.0 {
            (to_target.dot(path) / length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (t, self.previous_position.lerp(self.position, t))
    }

    /// Check collision with a vehicle hitbox (circle on the ground plane) anywhere along
    /// the path flown this tick
    pub fn check_hit(&self, target: Vec3, target_radius: f32) -> bool {
        self.impact_with(target, target_radius).is_some()
    }

    fn impact_with(&self, target: Vec3, target_radius: f32) -> Option<(f32, Vec3)> {
        let (t, point) = self.closest_approach(target);
        let dx = point.x - target.x;
        let dz = point.z - target.z;
        (dx * dx + dz * dz <= target_radius * target_radius).then_some((t, point))
    }
}

/// Outcome of a fire attempt. Cooldown rejection is `fired == false`, never an error.
#[derive(Debug, Clone, Default)]
pub struct FireResult {
    pub fired: bool,
    pub projectiles: Vec<Projectile>,
}

impl FireResult {
    fn rejected() -> Self {
        Self::default()
    }
}

/// Projectiles after one advance step
#[derive(Debug, Default)]
pub struct AdvanceResult {
    pub remaining: Vec<Projectile>,
    /// Ballistic projectiles that reached the ground this tick, clamped to ground height
    pub grounded: Vec<Projectile>,
    pub expired: usize,
}

/// A live vehicle as seen by hit resolution
#[derive(Debug, Clone, Copy)]
pub struct HitTarget {
    pub id: Uuid,
    pub position: Vec3,
    pub hitbox_radius: f32,
}

impl From<&VehicleInstance> for HitTarget {
    fn from(vehicle: &VehicleInstance) -> Self {
        Self {
            id: vehicle.id,
            position: vehicle.position,
            hitbox_radius: vehicle.vehicle_type.hitbox_radius,
        }
    }
}

/// Hit result from combat resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitResult {
    pub projectile_id: Uuid,
    pub shooter_id: Uuid,
    pub target_id: Uuid,
    pub damage: u32,
    pub position: Vec3,
    /// Area damage rather than a direct hit
    pub splash: bool,
}

/// Combat system for firing and projectile management
pub struct WeaponSystem;

impl WeaponSystem {
    /// Attempt to fire the vehicle's weapon at `now` (ms)
    pub fn try_fire(vehicle: &mut VehicleInstance, now: u64) -> FireResult {
        if !vehicle.alive {
            return FireResult::rejected();
        }
        if now < vehicle.weapon_cooldown_until {
            debug!(
                vehicle_id = %vehicle.id,
                remaining_ms = vehicle.cooldown_remaining_ms(now),
                "Fire rejected, weapon cooling down"
            );
            return FireResult::rejected();
        }

        vehicle.weapon_cooldown_until = now + vehicle.vehicle_type.weapon.cooldown_ms;
        let projectiles = Self::spawn_volley(vehicle, now);
        let weapon = &vehicle.vehicle_type.weapon;

        debug!(
            vehicle_id = %vehicle.id,
            weapon = weapon.kind.display_name(),
            count = projectiles.len(),
            "Weapon fired"
        );

        FireResult {
            fired: true,
            projectiles,
        }
    }

    /// One projectile per emitter, all sharing the vehicle's heading. No cooldown check;
    /// also used to replay shots relayed from remote players.
    pub fn spawn_volley(vehicle: &VehicleInstance, now: u64) -> Vec<Projectile> {
        let weapon = &vehicle.vehicle_type.weapon;
        let forward = vehicle.forward();
        let right = vehicle.right();
        let mut velocity = forward * weapon.projectile_speed;
        if weapon.projectile == ProjectileKind::Ballistic {
            velocity.y = weapon.launch_lift;
        }

        weapon
            .emitters
            .iter()
            .map(|emitter| {
                let mut origin = vehicle.position + right * emitter.lateral + forward * emitter.forward;
                origin.y = emitter.height;
                Projectile {
                    id: Uuid::new_v4(),
                    kind: weapon.projectile,
                    weapon: weapon.kind,
                    owner_id: vehicle.id,
                    spawn_position: origin,
                    position: origin,
                    previous_position: origin,
                    velocity,
                    spawn_time: now,
                    lifetime_ms: weapon.lifetime_ms,
                    damage: weapon.damage,
                    splash_radius: weapon.splash_radius,
                    arc: weapon.arc,
                    descending: false,
                }
            })
            .collect()
    }

    /// Move every projectile by `dt` seconds and cull the ones that expired or landed
    pub fn advance_projectiles(projectiles: Vec<Projectile>, dt: f32, now: u64) -> AdvanceResult {
        let mut result = AdvanceResult {
            remaining: Vec::with_capacity(projectiles.len()),
            ..Default::default()
        };

        for mut projectile in projectiles {
            projectile.advance(dt, now);

            if projectile.is_grounded() {
                projectile.position.y = GROUND_CONTACT_HEIGHT;
                result.grounded.push(projectile);
            } else if projectile.is_expired(now) {
                result.expired += 1;
            } else {
                result.remaining.push(projectile);
            }
        }

        if result.expired > 0 || !result.grounded.is_empty() {
            debug!(
                expired = result.expired,
                grounded = result.grounded.len(),
                "Projectiles removed"
            );
        }

        result
    }

    /// Resolve projectiles against live vehicles. A projectile hits the first non-owner
    /// along its path this tick and is removed; splash weapons also damage everyone else
    /// in radius of the impact.
    pub fn resolve_hits(projectiles: &mut Vec<Projectile>, targets: &[HitTarget]) -> Vec<HitResult> {
        let mut hits = Vec::new();

        projectiles.retain(|projectile| {
            let struck = targets
                .iter()
                .filter(|target| target.id != projectile.owner_id)
                .filter_map(|target| {
                    projectile
                        .impact_with(target.position, target.hitbox_radius)
                        .map(|(t, point)| (t, point, target))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0));

            let Some((_, impact, target)) = struck else {
                return true;
            };

            hits.push(HitResult {
                projectile_id: projectile.id,
                shooter_id: projectile.owner_id,
                target_id: target.id,
                damage: projectile.damage,
                position: impact,
                splash: false,
            });
            hits.extend(Self::splash(projectile, impact, targets, Some(target.id)));
            false
        });

        hits
    }

    /// Area damage around `impact` for splash weapons; empty for everything else
    pub fn splash(
        projectile: &Projectile,
        impact: Vec3,
        targets: &[HitTarget],
        exclude: Option<Uuid>,
    ) -> Vec<HitResult> {
        let Some(radius) = projectile.splash_radius else {
            return Vec::new();
        };

        targets
            .iter()
            .filter(|target| target.id != projectile.owner_id && Some(target.id) != exclude)
            .filter(|target| {
                let dx = target.position.x - impact.x;
                let dz = target.position.z - impact.z;
                let reach = radius + target.hitbox_radius;
                dx * dx + dz * dz <= reach * reach
            })
            .map(|target| HitResult {
                projectile_id: projectile.id,
                shooter_id: projectile.owner_id,
                target_id: target.id,
                damage: projectile.damage,
                position: impact,
                splash: true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::VehicleCatalog;
    use std::sync::Arc;

    fn vehicle(type_id: &str) -> VehicleInstance {
        let catalog = VehicleCatalog::builtin().unwrap();
        VehicleInstance::spawn(&catalog, type_id, Uuid::new_v4(), Vec3::ZERO, 0.0).unwrap()
    }

    fn fly(projectiles: Vec<Projectile>, from: u64, ticks: u64) -> (AdvanceResult, u64) {
        let mut now = from;
        let mut current = AdvanceResult {
            remaining: projectiles,
            ..Default::default()
        };
        for _ in 0..ticks {
            now += 16;
            current = WeaponSystem::advance_projectiles(current.remaining, 0.016, now);
        }
        (current, now)
    }

    #[test]
    fn cooldown_gates_fire() {
        // Razorback dual cannons: 5000 ms cooldown
        let mut car = vehicle("razorback");
        assert!(WeaponSystem::try_fire(&mut car, 1000).fired);
        assert_eq!(car.weapon_cooldown_until, 6000);

        let blocked = WeaponSystem::try_fire(&mut car, 4000);
        assert!(!blocked.fired);
        assert!(blocked.projectiles.is_empty());
        assert_eq!(car.weapon_cooldown_until, 6000);

        assert!(WeaponSystem::try_fire(&mut car, 6000).fired);
    }

    #[test]
    fn firing_twice_in_one_window_spawns_once() {
        let mut car = vehicle("scorpion");
        let first = WeaponSystem::try_fire(&mut car, 500);
        let second = WeaponSystem::try_fire(&mut car, 500);
        assert_eq!(first.projectiles.len(), 1);
        assert!(second.projectiles.is_empty());
    }

    #[test]
    fn twin_emitters_fire_a_matched_pair() {
        let mut car = vehicle("razorback");
        car.heading = 0.9;
        let result = WeaponSystem::try_fire(&mut car, 0);
        assert_eq!(result.projectiles.len(), 2);

        let (a, b) = (&result.projectiles[0], &result.projectiles[1]);
        assert_eq!(a.spawn_time, b.spawn_time);
        assert_eq!(a.velocity, b.velocity);
        assert!(a.velocity.normalize().dot(b.velocity.normalize()) > 0.9999);
        assert_ne!(a.spawn_position, b.spawn_position);
        assert!((a.spawn_position.distance(b.spawn_position) - 1.5).abs() < 1e-4);
    }

    #[test]
    fn emitters_are_placed_relative_to_heading() {
        let mut car = vehicle("razorback");
        let result = WeaponSystem::try_fire(&mut car, 0);
        let spawn = result.projectiles[0].spawn_position;
        assert!((spawn - Vec3::new(0.75, 1.1, -2.5)).length() < 1e-5);
        let velocity = result.projectiles[0].velocity;
        assert!((velocity.z + 200.0).abs() < 1e-3);
        assert_eq!(velocity.y, 5.0);
    }

    #[test]
    fn dead_vehicle_cannot_fire() {
        let mut car = vehicle("scorpion");
        car.alive = false;
        assert!(!WeaponSystem::try_fire(&mut car, 10_000).fired);
    }

    #[test]
    fn ballistic_arc_rises_then_holds() {
        let mut car = vehicle("scorpion");
        let shot = WeaponSystem::try_fire(&mut car, 0).projectiles;
        let start_height = shot[0].position.y;

        let (ascent, now) = fly(shot, 0, 20);
        let after_ascent = ascent.remaining[0].position.y;
        assert!(after_ascent > start_height + 1.0);
        assert_eq!(ascent.remaining[0].phase(now), ArcPhase::Ascent);

        // Finish the ascent (ends at 500 ms)
        let (held, now) = fly(ascent.remaining, now, 12);
        assert_eq!(held.remaining[0].phase(now), ArcPhase::Apex);
        let apex_start = held.remaining[0].position.y;

        let (apex, now) = fly(held.remaining, now, 40);
        assert_eq!(apex.remaining[0].phase(now), ArcPhase::Apex);
        let climb = apex.remaining[0].position.y - apex_start;
        assert!(climb > 0.0 && climb < 0.5);
    }

    #[test]
    fn grounded_shell_is_removed_on_the_same_tick() {
        let catalog = VehicleCatalog::builtin().unwrap();
        let mut vehicle_type = (*catalog.get("razorback").unwrap()).clone();
        vehicle_type.weapon.launch_lift = 0.0;
        let mut car = VehicleInstance::new(Uuid::new_v4(), Arc::new(vehicle_type), Vec3::ZERO, 0.0);

        let mut remaining = WeaponSystem::try_fire(&mut car, 0).projectiles;
        let mut grounded = 0;
        let mut now = 0;
        while !remaining.is_empty() {
            now += 16;
            let result = WeaponSystem::advance_projectiles(remaining, 0.016, now);
            assert!(result.remaining.iter().all(|p| p.position.y > GROUND_CONTACT_HEIGHT));
            assert!(result.grounded.iter().all(|p| p.position.y == GROUND_CONTACT_HEIGHT));
            grounded += result.grounded.len();
            remaining = result.remaining;
        }
        assert_eq!(grounded, 2);
        assert!(now < 3000, "shell should land before its lifetime ends");
    }

    #[test]
    fn every_builtin_shell_lands_before_expiring() {
        for type_id in ["razorback", "ironclad", "scorpion"] {
            let mut car = vehicle(type_id);
            let mut remaining = WeaponSystem::try_fire(&mut car, 0).projectiles;
            let emitters = remaining.len();
            let lifetime = remaining[0].lifetime_ms;

            let (mut grounded, mut expired, mut now) = (0, 0, 0);
            while !remaining.is_empty() {
                now += 16;
                let result = WeaponSystem::advance_projectiles(remaining, 0.016, now);
                grounded += result.grounded.len();
                expired += result.expired;
                remaining = result.remaining;
            }
            assert_eq!(grounded, emitters, "{type_id} shells should reach the ground");
            assert_eq!(expired, 0, "{type_id} shells expired in the air");
            assert!(now < lifetime);
        }
    }

    #[test]
    fn descent_starts_from_rest() {
        let mut car = vehicle("scorpion");
        let shot = WeaponSystem::try_fire(&mut car, 0).projectiles;
        let (apex, now) = fly(shot, 0, 124);
        assert_eq!(apex.remaining[0].phase(now), ArcPhase::Apex);
        let top = apex.remaining[0].position.y;

        let (falling, now) = fly(apex.remaining, now, 1);
        assert_eq!(falling.remaining[0].phase(now), ArcPhase::Descent);
        let first_drop = top - falling.remaining[0].position.y;
        let expected = -GRAVITY * 2.0 * 0.016 * 0.016;
        assert!((first_drop - expected).abs() < 1e-4);
    }

    #[test]
    fn ballistic_expires_by_lifetime() {
        let mut car = vehicle("razorback");
        let shot = WeaponSystem::try_fire(&mut car, 0).projectiles;
        let (early, _) = fly(shot.clone(), 0, 100);
        assert_eq!(early.remaining.len(), 2);

        let result = WeaponSystem::advance_projectiles(shot, 0.016, 3000);
        assert!(result.remaining.is_empty());
        assert_eq!(result.expired, 2);
    }

    #[test]
    fn beam_keeps_height_and_expires_by_lifetime_only() {
        let mut van = vehicle("junkyard_king");
        let flames = WeaponSystem::try_fire(&mut van, 0).projectiles;
        assert_eq!(flames.len(), 2);
        assert!(flames.iter().all(|p| p.kind == ProjectileKind::Beam));
        let height = flames[0].position.y;

        let (halfway, now) = fly(flames, 0, 47);
        assert_eq!(halfway.remaining.len(), 2);
        assert_eq!(halfway.remaining[0].position.y, height);
        assert!((halfway.remaining[0].decay(now) - 0.5).abs() < 0.01);

        let (done, _) = fly(halfway.remaining, now, 47);
        assert!(done.remaining.is_empty());
        assert!(done.grounded.is_empty());
        assert_eq!(done.expired, 2);
    }

    #[test]
    fn projectile_hits_target_but_not_owner() {
        let mut shooter = vehicle("scorpion");
        let mut shots = WeaponSystem::try_fire(&mut shooter, 0).projectiles;
        let target_id = Uuid::new_v4();
        let targets = [
            HitTarget::from(&shooter),
            HitTarget {
                id: target_id,
                position: shots[0].position,
                hitbox_radius: 2.0,
            },
        ];

        let hits = WeaponSystem::resolve_hits(&mut shots, &targets);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, target_id);
        assert_eq!(hits[0].damage, 30);
        assert!(!hits[0].splash);
        assert!(shots.is_empty());
    }

    /// Advance and resolve tick by tick until something is hit
    fn fly_at(
        mut projectiles: Vec<Projectile>,
        targets: &[HitTarget],
        max_ticks: u64,
    ) -> (Vec<HitResult>, u64) {
        let mut now = 0;
        for tick in 1..=max_ticks {
            now += 16;
            projectiles = WeaponSystem::advance_projectiles(projectiles, 0.016, now).remaining;
            let hits = WeaponSystem::resolve_hits(&mut projectiles, targets);
            if !hits.is_empty() {
                return (hits, tick);
            }
        }
        (Vec::new(), max_ticks)
    }

    #[test]
    fn fast_rocket_hits_target_between_samples() {
        // 4.48 units per tick: samples at z = -22.40 and -26.88 both clear a 1.5 hitbox
        let mut shooter = vehicle("scorpion");
        let rocket = WeaponSystem::try_fire(&mut shooter, 0).projectiles;
        let target = HitTarget {
            id: Uuid::new_v4(),
            position: Vec3::new(0.0, 0.0, -24.64),
            hitbox_radius: 1.5,
        };

        let (hits, tick) = fly_at(rocket, &[target], 20);
        assert_eq!(tick, 6);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, target.id);
        assert_eq!(hits[0].damage, 30);
        assert!((hits[0].position.z + 24.64).abs() < 0.01);
        assert!(hits[0].position.x.abs() < 1e-4);
    }

    #[test]
    fn flame_beam_cannot_pass_through_a_vehicle() {
        // 7.68 units per tick: samples land 3.84 either side of the hitbox centre
        let mut van = vehicle("junkyard_king");
        let flames = WeaponSystem::try_fire(&mut van, 0).projectiles;
        let target = HitTarget {
            id: Uuid::new_v4(),
            position: Vec3::new(0.0, 0.0, -30.08),
            hitbox_radius: 2.5,
        };

        let (hits, tick) = fly_at(flames, &[target], 20);
        assert_eq!(tick, 4);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.target_id == target.id && h.damage == 10));
    }

    #[test]
    fn nearest_target_along_the_path_is_struck() {
        let mut shooter = vehicle("scorpion");
        let rocket = WeaponSystem::try_fire(&mut shooter, 0).projectiles;
        let near = HitTarget {
            id: Uuid::new_v4(),
            position: Vec3::new(0.0, 0.0, -24.0),
            hitbox_radius: 1.5,
        };
        let far = HitTarget {
            id: Uuid::new_v4(),
            position: Vec3::new(0.0, 0.0, -26.0),
            hitbox_radius: 1.5,
        };

        let (hits, tick) = fly_at(rocket, &[far, near], 20);
        // Both lie on the sixth tick's path
        assert_eq!(tick, 6);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, near.id);
    }

    #[test]
    fn miss_leaves_projectile_in_flight() {
        let mut shooter = vehicle("scorpion");
        let mut shots = WeaponSystem::try_fire(&mut shooter, 0).projectiles;
        let far = HitTarget {
            id: Uuid::new_v4(),
            position: Vec3::new(100.0, 0.0, 100.0),
            hitbox_radius: 2.0,
        };
        assert!(WeaponSystem::resolve_hits(&mut shots, &[far]).is_empty());
        assert_eq!(shots.len(), 1);
    }

    #[test]
    fn mortar_splash_reaches_bystanders() {
        let mut truck = vehicle("ironclad");
        let mut shells = WeaponSystem::try_fire(&mut truck, 0).projectiles;
        let impact = shells[0].position;
        let direct = Uuid::new_v4();
        let bystander = Uuid::new_v4();
        let targets = [
            HitTarget {
                id: direct,
                position: impact,
                hitbox_radius: 1.5,
            },
            HitTarget {
                id: bystander,
                position: impact + Vec3::new(4.0, 0.0, 0.0),
                hitbox_radius: 1.5,
            },
            HitTarget {
                id: Uuid::new_v4(),
                position: impact + Vec3::new(30.0, 0.0, 0.0),
                hitbox_radius: 1.5,
            },
        ];

        let hits = WeaponSystem::resolve_hits(&mut shells, &targets);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h.target_id == direct && !h.splash));
        assert!(hits.iter().any(|h| h.target_id == bystander && h.splash));
    }

    #[test]
    fn landed_mortar_splashes_bystanders() {
        let mut truck = vehicle("ironclad");
        let mut remaining = WeaponSystem::try_fire(&mut truck, 0).projectiles;
        let mut now = 0;
        let shell = loop {
            now += 16;
            let mut result = WeaponSystem::advance_projectiles(remaining, 0.016, now);
            if let Some(shell) = result.grounded.pop() {
                break shell;
            }
            assert!(now < 3000, "mortar never landed");
            remaining = result.remaining;
        };

        let bystander = Uuid::new_v4();
        let targets = [
            HitTarget {
                id: bystander,
                position: shell.position + Vec3::new(4.0, 0.0, 0.0),
                hitbox_radius: 3.5,
            },
            HitTarget {
                id: Uuid::new_v4(),
                position: shell.position + Vec3::new(20.0, 0.0, 0.0),
                hitbox_radius: 3.5,
            },
        ];
        let hits = WeaponSystem::splash(&shell, shell.position, &targets, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, bystander);
        assert_eq!(hits[0].damage, 40);
        assert!(hits[0].splash);
    }
}
