//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing and display-refresh scheduling
//! - Keyboard input
//! - Display sizing
//! - Storage (sessionStorage on web) and canvas mounting

pub mod input;
pub mod scheduler;
pub mod time;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputMapper, KeyResponse, KeyboardState};
pub use scheduler::{FrameDriver, FrameHandle, FrameScheduler, ManualScheduler, SchedulerError};
pub use time::FrameClock;
pub use viewport::{DisplaySize, fit_display};
