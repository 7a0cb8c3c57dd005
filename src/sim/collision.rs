//! Road-edge collision response
//!
//! The vehicle is kept between the road edges (inset by the sprite
//! half-width). Touching an edge clamps the position and scrubs speed.

use super::road::RoadSample;
use crate::tuning::CollisionTuning;

/// Which edge, if any, the vehicle touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Result of resolving the vehicle against one road sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub lateral: f32,
    pub speed: f32,
    pub edge: Option<Edge>,
}

impl Contact {
    pub fn hit(&self) -> bool {
        self.edge.is_some()
    }
}

/// Clamp `lateral` inside the road sample and apply the restitution penalty
pub fn resolve(lateral: f32, speed: f32, road: &RoadSample, tuning: &CollisionTuning) -> Contact {
    let min_x = road.left_edge + tuning.margin;
    let max_x = road.right_edge - tuning.margin;

    if lateral < min_x {
        Contact {
            lateral: min_x,
            speed: speed * tuning.restitution,
            edge: Some(Edge::Left),
        }
    } else if lateral > max_x {
        Contact {
            lateral: max_x,
            speed: speed * tuning.restitution,
            edge: Some(Edge::Right),
        }
    } else {
        Contact {
            lateral,
            speed,
            edge: None,
        }
    }
}
