//! Vehicle combat simulation modules

pub mod catalog;
pub mod combat;
pub mod damage;
pub mod physics;
pub mod simulation;
pub mod snapshot;
pub mod sync;
pub mod vehicle;

pub use catalog::{CatalogError, VehicleCatalog, VehicleType};
pub use simulation::{SimConfig, SimError, Simulation};
pub use snapshot::FrameSnapshot;
pub use vehicle::{DamageState, VehicleInstance};

use serde::{Deserialize, Serialize};

/// Device state for one frame, already debounced by the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub fire: bool,
    /// Handbrake
    pub drift: bool,
}

impl InputState {
    /// Steering direction: +1 left, -1 right, 0 when neither or both are held
    pub fn steer(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_steer_cancels() {
        let both = InputState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both.steer(), 0.0);
        assert_eq!(InputState::default().steer(), 0.0);
    }
}
