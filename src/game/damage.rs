//! Health mutation and banded damage-state classification

use serde::Serialize;
use tracing::{debug, info};

use super::vehicle::{DamageState, VehicleInstance};

/// Result of applying damage to a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DamageOutcome {
    pub new_state: DamageState,
    /// The vehicle moved into a different band on this call
    pub transitioned: bool,
    /// This call took the vehicle to zero health
    pub destroyed: bool,
}

pub struct DamageStateMachine;

impl DamageStateMachine {
    /// Subtract `amount` from health and reclassify. Dead vehicles are left untouched.
    pub fn apply_damage(vehicle: &mut VehicleInstance, amount: u32) -> DamageOutcome {
        if !vehicle.alive {
            return DamageOutcome {
                new_state: vehicle.damage_state,
                transitioned: false,
                destroyed: false,
            };
        }

        let max_health = vehicle.vehicle_type.max_health;
        let health = vehicle.health.saturating_sub(amount).min(max_health);
        Self::set_health(vehicle, health)
    }

    /// Overwrite health from an authoritative report (remote mirrors). Health may
    /// only go down; a higher report is ignored.
    pub fn sync_health(vehicle: &mut VehicleInstance, reported: u32) -> DamageOutcome {
        if !vehicle.alive || reported >= vehicle.health {
            return DamageOutcome {
                new_state: vehicle.damage_state,
                transitioned: false,
                destroyed: false,
            };
        }
        Self::set_health(vehicle, reported)
    }

    fn set_health(vehicle: &mut VehicleInstance, health: u32) -> DamageOutcome {
        let previous = vehicle.damage_state;
        vehicle.health = health;
        vehicle.damage_state = vehicle.vehicle_type.damage_bands.classify(health);

        let transitioned = previous != vehicle.damage_state;
        if transitioned {
            info!(
                vehicle_id = %vehicle.id,
                from = ?previous,
                to = ?vehicle.damage_state,
                health,
                "Damage state changed"
            );
        } else {
            debug!(vehicle_id = %vehicle.id, health, "Vehicle damaged");
        }

        let destroyed = health == 0;
        if destroyed {
            vehicle.alive = false;
            info!(vehicle_id = %vehicle.id, vehicle_type = %vehicle.type_id(), "Vehicle destroyed");
        }

        DamageOutcome {
            new_state: vehicle.damage_state,
            transitioned,
            destroyed,
        }
    }
}
