//! Data-driven game balance
//!
//! Every numeric constant the simulation and renderer read lives here, so a
//! JSON file (native) or the settings blob in session storage (web) can
//! override any subset of them. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{LOGICAL_CENTER_X, LOGICAL_WIDTH, ROAD_BORDER_WIDTH};

/// Errors from loading tuning or settings JSON
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

/// Procedural road shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadTuning {
    /// Road width in logical pixels
    pub width: f32,
    /// World distance → phase scale (k1)
    pub frequency: f64,
    /// Primary sine amplitude
    pub primary_amplitude: f32,
    /// Secondary sine amplitude
    pub secondary_amplitude: f32,
    /// Secondary phase multiplier (k2)
    pub secondary_frequency: f64,
    /// Secondary phase offset (radians)
    pub secondary_phase: f64,
    /// Length of one dash (and one gap) of the centerline, world pixels
    pub dash_period: f64,
}

impl Default for RoadTuning {
    fn default() -> Self {
        Self {
            width: 120.0,
            frequency: 0.0025,
            primary_amplitude: 40.0,
            secondary_amplitude: 18.0,
            secondary_frequency: 0.37,
            secondary_phase: 1.2,
            dash_period: 6.0,
        }
    }
}

/// Arcade vehicle model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Top forward speed (px/s)
    pub max_speed: f32,
    /// Most negative speed allowed (px/s)
    pub reverse_cap: f32,
    /// Throttle acceleration (px/s²)
    pub accel: f32,
    /// Brake deceleration (px/s²)
    pub brake_decel: f32,
    /// Coasting deceleration toward zero (px/s²)
    pub friction: f32,
    /// Lateral shift per tick at zero speed (px)
    pub turn_rate: f32,
    /// Per-tick multiplier applied to heading bias
    pub heading_damping: f32,
    /// Sprite rotation per unit of heading bias (radians)
    pub tilt_per_heading: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 160.0,
            reverse_cap: -30.0,
            accel: 120.0,
            brake_decel: 170.0,
            friction: 80.0,
            turn_rate: 2.2,
            heading_damping: 0.85,
            tilt_per_heading: 0.05,
        }
    }
}

/// Road-edge contact response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Distance kept between vehicle center and road edge (sprite half-width)
    pub margin: f32,
    /// Speed multiplier on edge contact
    pub restitution: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            margin: 7.0,
            restitution: 0.7,
        }
    }
}

/// Distance bookkeeping and HUD units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceTuning {
    /// Logical pixels → meters
    pub meters_per_pixel: f64,
    /// px/s → displayed km/h
    pub kmh_per_speed: f32,
    /// Largest simulated step per frame (seconds)
    pub max_step: f32,
}

impl Default for DistanceTuning {
    fn default() -> Self {
        Self {
            meters_per_pixel: 0.8,
            kmh_per_speed: 0.6,
            max_step: 0.033,
        }
    }
}

/// All gameplay tuning
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub road: RoadTuning,
    pub vehicle: VehicleTuning,
    pub collision: CollisionTuning,
    pub distance: DistanceTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning blob and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.road.width > 0.0) {
            return Err(ConfigError::Invalid("road.width must be positive"));
        }
        let finite = [
            self.road.frequency,
            self.road.secondary_frequency,
            self.road.secondary_phase,
            f64::from(self.road.primary_amplitude),
            f64::from(self.road.secondary_amplitude),
            f64::from(self.vehicle.accel),
            f64::from(self.vehicle.brake_decel),
            f64::from(self.vehicle.turn_rate),
            f64::from(self.vehicle.tilt_per_heading),
            f64::from(self.distance.kmh_per_speed),
            self.distance.meters_per_pixel,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("tuning values must be finite"));
        }
        if !(self.vehicle.accel >= 0.0 && self.vehicle.brake_decel >= 0.0 && self.vehicle.turn_rate >= 0.0) {
            return Err(ConfigError::Invalid("vehicle rates must not be negative"));
        }
        // widest the road (with its borders) can ever reach from the center
        let reach = self.road.primary_amplitude.abs()
            + self.road.secondary_amplitude.abs()
            + self.road.width / 2.0
            + ROAD_BORDER_WIDTH;
        if !(LOGICAL_CENTER_X - reach >= 0.0 && LOGICAL_CENTER_X + reach <= LOGICAL_WIDTH as f32) {
            return Err(ConfigError::Invalid("road must stay on the drawing surface"));
        }
        if !(self.road.dash_period > 0.0) {
            return Err(ConfigError::Invalid("road.dash_period must be positive"));
        }
        if !(self.vehicle.max_speed > 0.0) {
            return Err(ConfigError::Invalid("vehicle.max_speed must be positive"));
        }
        if !(self.vehicle.reverse_cap <= 0.0) {
            return Err(ConfigError::Invalid("vehicle.reverse_cap must not be positive"));
        }
        if !(self.vehicle.friction >= 0.0) {
            return Err(ConfigError::Invalid("vehicle.friction must not be negative"));
        }
        if !(0.0..1.0).contains(&self.vehicle.heading_damping) {
            return Err(ConfigError::Invalid("vehicle.heading_damping must be in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.collision.restitution) {
            return Err(ConfigError::Invalid("collision.restitution must be in [0, 1]"));
        }
        if !(self.collision.margin >= 0.0 && self.collision.margin * 2.0 < self.road.width) {
            return Err(ConfigError::Invalid("collision.margin must fit inside the road"));
        }
        if !(self.distance.max_step > 0.0) {
            return Err(ConfigError::Invalid("distance.max_step must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"vehicle": {"max_speed": 200.0}}"#).unwrap();
        assert_eq!(tuning.vehicle.max_speed, 200.0);
        assert_eq!(tuning.vehicle.accel, VehicleTuning::default().accel);
        assert_eq!(tuning.road, RoadTuning::default());
    }

    #[test]
    fn test_rejects_margin_wider_than_road() {
        let err = Tuning::from_json(r#"{"collision": {"margin": 80.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_road_leaving_the_canvas() {
        // 160 - (80 + 18 + 60 + 2) < 0
        let err = Tuning::from_json(r#"{"road": {"primary_amplitude": 80.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Tuning::from_json(r#"{"road": {"width": 200.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        // border touching both canvas edges is still on the canvas
        let edge = r#"{"road": {"primary_amplitude": 80.0, "secondary_amplitude": 0.0, "width": 156.0}}"#;
        assert!(Tuning::from_json(edge).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_rates() {
        let mut tuning = Tuning::default();
        tuning.vehicle.accel = f32::INFINITY;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));

        let mut tuning = Tuning::default();
        tuning.road.frequency = f64::NAN;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.vehicle.turn_rate = f32::NEG_INFINITY;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
