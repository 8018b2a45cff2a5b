//! Per-participant vehicle state

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{CatalogError, VehicleCatalog, VehicleType};

/// Banded health classification. Ordering follows severity: `Pristine` is the
/// greatest, `Critical` the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageState {
    Critical,
    Wrecked,
    Scratched,
    Pristine,
}

/// Smoothed body lean in radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tilt {
    /// Longitudinal pitch (rotation about the lateral axis)
    pub x: f32,
    /// Lateral roll (rotation about the longitudinal axis)
    pub z: f32,
}

impl Tilt {
    pub fn is_neutral(&self, tolerance: f32) -> bool {
        self.x.abs() <= tolerance && self.z.abs() <= tolerance
    }
}

/// A vehicle owned by the simulation. Rendering handles live elsewhere, keyed by `id`.
#[derive(Debug, Clone)]
pub struct VehicleInstance {
    pub id: Uuid,
    pub vehicle_type: Arc<VehicleType>,

    // Kinematics
    /// Ground-plane position; `y` stays at 0, height is a rendering concern
    pub position: Vec3,
    /// Radians, wrapped to (-π, π]
    pub heading: f32,
    /// Signed, forward-positive, units per nominal frame
    pub current_speed: f32,
    pub current_turn_angle: f32,
    pub tilt: Tilt,
    pub boosting: bool,
    pub drifting: bool,
    /// 1.0 = full grip; drops toward the drift factor under handbrake
    pub lateral_grip: f32,

    // Combat
    pub health: u32,
    pub damage_state: DamageState,
    pub weapon_cooldown_until: u64,
    pub alive: bool,
}

impl VehicleInstance {
    pub fn new(id: Uuid, vehicle_type: Arc<VehicleType>, position: Vec3, heading: f32) -> Self {
        let health = vehicle_type.max_health;
        let damage_state = vehicle_type.damage_bands.classify(health);
        Self {
            id,
            vehicle_type,
            position: Vec3::new(position.x, 0.0, position.z),
            heading,
            current_speed: 0.0,
            current_turn_angle: 0.0,
            tilt: Tilt::default(),
            boosting: false,
            drifting: false,
            lateral_grip: 1.0,
            health,
            damage_state,
            weapon_cooldown_until: 0,
            alive: true,
        }
    }

    /// Create an instance from a catalog id, rejecting unknown types
    pub fn spawn(
        catalog: &VehicleCatalog,
        vehicle_type_id: &str,
        id: Uuid,
        position: Vec3,
        heading: f32,
    ) -> Result<Self, CatalogError> {
        let vehicle_type = catalog.get(vehicle_type_id)?;
        Ok(Self::new(id, vehicle_type, position, heading))
    }

    /// Unit vector the nose points along
    pub fn forward(&self) -> Vec3 {
        heading_forward(self.heading)
    }

    /// Unit vector to the vehicle's right
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.heading.cos(), 0.0, -self.heading.sin())
    }

    /// Forward speed cap with the currently active boost
    pub fn speed_cap(&self) -> f32 {
        let vt = &self.vehicle_type;
        if self.boosting {
            vt.max_speed * vt.boost_multiplier
        } else {
            vt.max_speed
        }
    }

    pub fn cooldown_remaining_ms(&self, now: u64) -> u64 {
        self.weapon_cooldown_until.saturating_sub(now)
    }

    pub fn type_id(&self) -> &str {
        &self.vehicle_type.id
    }
}

/// Forward unit vector for a heading (heading 0 faces -z)
pub fn heading_forward(heading: f32) -> Vec3 {
    Vec3::new(-heading.sin(), 0.0, -heading.cos())
}

/// Wrap an angle to (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
