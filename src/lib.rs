//! Pixel Racer - A top-down endless road racer
//!
//! Core modules:
//! - `sim`: Simulation (road generator, vehicle physics, collisions, step)
//! - `renderer`: Software 320x240 canvas plus WebGPU presentation
//! - `platform`: Input mapping, frame timing/scheduling, browser glue
//! - `persistence`: Session-scoped key-value storage of the best distance
//! - `session`: One mounted game screen
//! - `tuning` / `settings`: Data-driven game balance and display preferences

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::GameSession;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical resolution; simulation and drawing always happen in this space
    pub const LOGICAL_WIDTH: u32 = 320;
    pub const LOGICAL_HEIGHT: u32 = 240;

    /// Screen row the vehicle is drawn on (fixed; the world scrolls past it)
    pub const VEHICLE_SCREEN_Y: f32 = LOGICAL_HEIGHT as f32 - 40.0;

    /// World-distance offset from the bottom of the screen to the vehicle row
    pub const VEHICLE_WORLD_OFFSET: f64 = (LOGICAL_HEIGHT as f32 - VEHICLE_SCREEN_Y) as f64;

    /// Horizontal logical center (vehicle spawn column, road base offset)
    pub const LOGICAL_CENTER_X: f32 = LOGICAL_WIDTH as f32 / 2.0;

    /// Border accent drawn outside each road edge
    pub const ROAD_BORDER_WIDTH: f32 = 2.0;
}
