//! Game state and core simulation types
//!
//! One `GameState` lives for one mounted game screen. Nothing here is global;
//! the owner threads it through the step and the renderer explicitly.

use serde::{Deserialize, Serialize};

use crate::consts::{LOGICAL_CENTER_X, VEHICLE_WORLD_OFFSET};

/// Whether the simulation step runs this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}

impl PauseState {
    pub fn toggled(self) -> Self {
        match self {
            PauseState::Running => PauseState::Paused,
            PauseState::Paused => PauseState::Running,
        }
    }

    pub fn is_paused(self) -> bool {
        self == PauseState::Paused
    }
}

/// The player's vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Center x in logical pixels
    pub lateral: f32,
    /// Signed speed (px/s); negative is reverse
    pub speed: f32,
    /// Visual tilt proxy, decays toward zero every tick
    pub heading_bias: f32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            lateral: LOGICAL_CENTER_X,
            speed: 0.0,
            heading_bias: 0.0,
        }
    }
}

/// Progress bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldState {
    /// Forward world distance (px); drives the road and never decreases
    pub distance_travelled: f64,
    /// Meters driven since mount
    pub session_meters: f64,
    /// Best `session_meters` seen this session (seeded from storage)
    pub best_meters: f64,
}

impl WorldState {
    pub fn with_best(best_meters: f64) -> Self {
        Self {
            best_meters,
            ..Default::default()
        }
    }

    /// World coordinate of the road under the vehicle's screen row
    pub fn vehicle_world_y(&self) -> f64 {
        self.distance_travelled + VEHICLE_WORLD_OFFSET
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub vehicle: VehicleState,
    pub world: WorldState,
}

impl GameState {
    /// Fresh session, seeded with a previously stored best distance
    pub fn new(best_meters: f64) -> Self {
        Self {
            vehicle: VehicleState::default(),
            world: WorldState::with_best(best_meters),
        }
    }
}
