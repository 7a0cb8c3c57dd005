//! Display sizing
//!
//! The game always draws at the logical resolution. Only the on-screen size
//! changes, in whole multiples so pixels stay square and crisp.

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// On-screen size of the canvas in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

/// Largest integer scale of the logical resolution that fits the container
/// (itself capped at `max_width` x `max_height`), never below 1x
pub fn fit_display(container_width: u32, container_height: u32, max_width: u32, max_height: u32) -> DisplaySize {
    let avail_w = container_width.min(max_width);
    let avail_h = container_height.min(max_height);
    let scale = (avail_w / LOGICAL_WIDTH).min(avail_h / LOGICAL_HEIGHT).max(1);
    DisplaySize {
        width: LOGICAL_WIDTH * scale,
        height: LOGICAL_HEIGHT * scale,
        scale,
    }
}
