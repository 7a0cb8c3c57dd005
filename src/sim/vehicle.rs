//! Arcade vehicle model
//!
//! Not a physical model: speed integrates pedal input with asymmetric
//! accel/brake, coasts toward zero, and steering is a direct lateral shift
//! whose authority grows with speed.

use super::state::VehicleState;
use super::tick::Controls;
use crate::tuning::VehicleTuning;

/// Advance the vehicle by one tick of `dt` seconds
pub fn advance(vehicle: &mut VehicleState, controls: &Controls, dt: f32, tuning: &VehicleTuning) {
    let dt = dt.max(0.0);

    if controls.accelerate {
        vehicle.speed += tuning.accel * dt;
    }
    if controls.brake {
        vehicle.speed -= tuning.brake_decel * dt;
    }

    // Coasting friction never crosses zero
    if !controls.accelerate && !controls.brake {
        let decay = tuning.friction * dt;
        if vehicle.speed > 0.0 {
            vehicle.speed = (vehicle.speed - decay).max(0.0);
        } else if vehicle.speed < 0.0 {
            vehicle.speed = (vehicle.speed + decay).min(0.0);
        }
    }

    vehicle.speed = vehicle.speed.clamp(tuning.reverse_cap, tuning.max_speed);

    let authority = tuning.turn_rate * (1.0 + vehicle.speed / tuning.max_speed);
    if controls.steer_left {
        vehicle.lateral -= authority;
    }
    if controls.steer_right {
        vehicle.lateral += authority;
    }

    let steer = f32::from(controls.steer_right as u8) - f32::from(controls.steer_left as u8);
    vehicle.heading_bias = (vehicle.heading_bias + steer) * tuning.heading_damping;
}

/// Sprite rotation in radians for the current heading bias
pub fn tilt_angle(vehicle: &VehicleState, tuning: &VehicleTuning) -> f32 {
    vehicle.heading_bias * tuning.tilt_per_heading
}
