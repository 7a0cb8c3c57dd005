//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only arrives as an explicit `dt`
//! - The road is a function of world distance, never cached
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod road;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use collision::{Contact, Edge, resolve};
pub use road::{RoadSample, centerline, dash_visible, max_excursion};
pub use state::{GameState, PauseState, VehicleState, WorldState};
pub use tick::{Controls, TickOutcome, autopilot, tick};
pub use vehicle::{advance, tilt_angle};
