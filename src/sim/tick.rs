//! Simulation step
//!
//! One call advances the vehicle, scrolls the world, resolves road-edge
//! contact and updates the distance bookkeeping. Pausing is handled by the
//! caller: a paused frame simply does not call `tick`.

use super::collision::{Edge, resolve};
use super::road::RoadSample;
use super::state::GameState;
use super::vehicle::advance;
use crate::tuning::Tuning;

/// Sustained control signal for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Pause toggle (edge-triggered, consumed by the frame driver)
    pub toggle_pause: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    /// Edge the vehicle scraped this tick
    pub contact: Option<Edge>,
    /// New session best (meters) to hand to persistence
    pub new_best: Option<f64>,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, controls: &Controls, dt: f32, tuning: &Tuning) -> TickOutcome {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    advance(&mut state.vehicle, controls, dt, &tuning.vehicle);

    // Reverse never rolls the world back
    let forward = f64::from(state.vehicle.speed.max(0.0)) * f64::from(dt);
    state.world.distance_travelled += forward;

    let road = RoadSample::at(state.world.vehicle_world_y(), &tuning.road);
    let contact = resolve(
        state.vehicle.lateral,
        state.vehicle.speed,
        &road,
        &tuning.collision,
    );
    state.vehicle.lateral = contact.lateral;
    state.vehicle.speed = contact.speed;

    let meters = f64::from(state.vehicle.speed.max(0.0))
        * f64::from(dt)
        * tuning.distance.meters_per_pixel;
    state.world.session_meters += meters;

    let new_best = if state.world.session_meters > state.world.best_meters {
        state.world.best_meters = state.world.session_meters;
        Some(state.world.best_meters)
    } else {
        None
    };

    TickOutcome {
        contact: contact.edge,
        new_best,
    }
}

/// Demo driver: full throttle, steering toward the road center at the
/// vehicle row
pub fn autopilot(state: &GameState, tuning: &Tuning) -> Controls {
    const DEADBAND: f32 = 3.0;

    let road = RoadSample::at(state.world.vehicle_world_y(), &tuning.road);
    let offset = road.center - state.vehicle.lateral;
    Controls {
        accelerate: true,
        brake: false,
        steer_left: offset < -DEADBAND,
        steer_right: offset > DEADBAND,
        toggle_pause: false,
    }
}
