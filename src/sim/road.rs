//! Procedural road centerline
//!
//! The road is a pure function of world distance: two layered sine waves
//! around the logical center. Nothing is cached; every consumer samples the
//! coordinate it needs.

use crate::consts::LOGICAL_CENTER_X;
use crate::tuning::RoadTuning;

/// Road centerline x at a world-distance coordinate
///
/// Total for every input and bounded by
/// `LOGICAL_CENTER_X ± (primary_amplitude + secondary_amplitude)`.
/// Non-finite coordinates have no phase and sit on the logical center.
#[inline]
pub fn centerline(world_y: f64, road: &RoadTuning) -> f32 {
    let t = world_y * road.frequency;
    if !t.is_finite() {
        return LOGICAL_CENTER_X;
    }
    let primary = road.primary_amplitude as f64 * t.sin();
    let secondary =
        road.secondary_amplitude as f64 * (t * road.secondary_frequency + road.secondary_phase).sin();
    LOGICAL_CENTER_X + (primary + secondary) as f32
}

/// Largest distance the centerline strays from the logical center
pub fn max_excursion(road: &RoadTuning) -> f32 {
    road.primary_amplitude.abs() + road.secondary_amplitude.abs()
}

/// Center and edges of the road at one world coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadSample {
    pub center: f32,
    pub left_edge: f32,
    pub right_edge: f32,
}

impl RoadSample {
    pub fn at(world_y: f64, road: &RoadTuning) -> Self {
        let center = centerline(world_y, road);
        let half = road.width / 2.0;
        Self {
            center,
            left_edge: center - half,
            right_edge: center + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.right_edge - self.left_edge
    }
}

/// Whether the centerline dash is drawn at a world coordinate
///
/// Dashes and gaps alternate every `dash_period` world pixels, so the phase
/// depends only on world distance.
#[inline]
pub fn dash_visible(world_y: f64, road: &RoadTuning) -> bool {
    ((world_y / road.dash_period).floor() as i64).rem_euclid(2) == 0
}
