//! Vehicle kinematics - arcade speed, steering, drift and body lean

use crate::util::time::{frame_scale, NOMINAL_FPS};

use super::catalog::VehicleType;
use super::vehicle::{wrap_angle, VehicleInstance};
use super::InputState;

/// Below this speed the vehicle does not steer
pub const TURN_SPEED_EPSILON: f32 = 0.01;
/// Weight kept from the previous tick's turn when blending
pub const TURN_SMOOTHING: f32 = 0.8;
/// Body lean limit (15 degrees)
pub const MAX_TILT: f32 = 0.261_799_4;
/// Lean below this is snapped to exactly neutral
const TILT_REST_EPSILON: f32 = 1e-4;
/// Fraction of the remaining gap to `drift_factor` closed per frame of handbrake
pub const HANDBRAKE_BITE: f32 = 0.25;

/// Hand-tuned arcade kinematic model (not a rigid-body solver)
pub struct KinematicModel;

impl KinematicModel {
    /// Advance one vehicle by `dt` seconds of input
    pub fn step(vehicle: &mut VehicleInstance, input: &InputState, dt: f32) {
        if !vehicle.alive || dt <= 0.0 {
            return;
        }

        let vt = vehicle.vehicle_type.clone();
        let frames = frame_scale(dt);

        vehicle.boosting = input.boost;
        Self::update_speed(vehicle, &vt, input, frames);
        Self::update_grip(vehicle, &vt, input, frames);
        let turn_per_frame = Self::update_heading(vehicle, &vt, input, frames);

        // Displacement along the (possibly reversed) heading
        let displacement = vehicle.forward() * vehicle.current_speed * frames;
        vehicle.position += displacement;

        Self::update_tilt(vehicle, &vt, turn_per_frame);
    }

    fn update_speed(vehicle: &mut VehicleInstance, vt: &VehicleType, input: &InputState, frames: f32) {
        let cap = vehicle.speed_cap();
        let acceleration = if input.boost {
            vt.acceleration * vt.boost_acceleration_multiplier
        } else {
            vt.acceleration
        } * frames;
        let speed = vehicle.current_speed;

        let next = if input.forward {
            approach(speed, cap, acceleration)
        } else if input.backward {
            approach(speed, -vt.max_speed * vt.reverse_speed_factor, acceleration)
        } else {
            coast(speed, vt, frames)
        };

        // Boost released above the plain cap: drop straight to the active cap
        vehicle.current_speed = next.clamp(-cap, cap);
    }

    fn update_grip(vehicle: &mut VehicleInstance, vt: &VehicleType, input: &InputState, frames: f32) {
        vehicle.drifting = input.drift && vehicle.current_speed.abs() > TURN_SPEED_EPSILON;
        if vehicle.drifting {
            let gap = vehicle.lateral_grip - vt.drift_factor;
            if gap > 0.0 {
                vehicle.lateral_grip -= gap * (HANDBRAKE_BITE * frames).min(1.0);
            }
        } else {
            vehicle.lateral_grip = (vehicle.lateral_grip + vt.drift_recovery * frames).min(1.0);
        }
    }

    /// Returns the raw (unsmoothed) turn per nominal frame
    fn update_heading(vehicle: &mut VehicleInstance, vt: &VehicleType, input: &InputState, frames: f32) -> f32 {
        let speed = vehicle.current_speed;
        if speed.abs() <= TURN_SPEED_EPSILON {
            // Parked vehicles never rotate, not even from residual smoothing
            vehicle.current_turn_angle = 0.0;
            return 0.0;
        }

        let steer = input.steer();
        let normalized_speed = (speed.abs() / vt.max_speed).min(1.0);
        let mut turn = vt.turn_rate * vt.turn_curve.multiplier(normalized_speed) * steer;

        // Reversing inverts steering sense
        turn *= speed.signum();
        if input.boost {
            turn *= vt.boost_turn_factor;
        }
        // A sliding rear rotates the car harder
        turn *= 2.0 - vehicle.lateral_grip;

        let raw = turn * frames;
        vehicle.current_turn_angle =
            vehicle.current_turn_angle * TURN_SMOOTHING + raw * (1.0 - TURN_SMOOTHING);
        vehicle.heading = wrap_angle(vehicle.heading + vehicle.current_turn_angle);

        turn
    }

    fn update_tilt(vehicle: &mut VehicleInstance, vt: &VehicleType, turn_per_frame: f32) {
        let signed_speed = vehicle.current_speed / vt.max_speed;
        let turn_per_second = turn_per_frame * NOMINAL_FPS as f32;

        let roll_target =
            (-turn_per_second * vt.body_roll_factor * signed_speed.abs()).clamp(-MAX_TILT, MAX_TILT);
        let pitch_target = (vt.suspension_stiffness * signed_speed).clamp(-MAX_TILT, MAX_TILT);

        let blend = vt.suspension_stiffness;
        vehicle.tilt.x = settle(vehicle.tilt.x + (pitch_target - vehicle.tilt.x) * blend);
        vehicle.tilt.z = settle(vehicle.tilt.z + (roll_target - vehicle.tilt.z) * blend);
    }
}

/// Move `current` toward `target` by at most `step`, never past it
fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// No throttle: rolling resistance or deceleration, whichever bites harder
fn coast(speed: f32, vt: &VehicleType, frames: f32) -> f32 {
    let decay = vt.deceleration.max(vt.rolling_resistance * speed.abs()) * frames;
    if speed.abs() <= decay {
        0.0
    } else {
        speed - speed.signum() * decay
    }
}

fn settle(tilt: f32) -> f32 {
    if tilt.abs() < TILT_REST_EPSILON {
        0.0
    } else {
        tilt
    }
}
