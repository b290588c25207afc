//! Core data types exchanged with the host robot.

use serde::{Deserialize, Serialize};

/// What an agent does in the swarm
///
/// Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Relays gossip while wandering
    #[default]
    Wanderer,
    /// Stationary destination, sole owner of its own table row
    Target,
    /// Homes in on `nav_target_id`
    Seeker,
}

impl Role {
    pub fn is_seeker(self) -> bool {
        matches!(self, Role::Seeker)
    }

    pub fn is_target(self) -> bool {
        matches!(self, Role::Target)
    }
}

/// One payload heard this tick, annotated by the radio
#[derive(Debug, Clone, PartialEq)]
pub struct Reception {
    /// Raw bytes as broadcast by the peer
    pub payload: Vec<u8>,
    /// Measured range to the sender
    pub range: f32,
    /// Measured bearing to the sender, relative to this agent's heading (radians)
    pub bearing: f32,
}

impl Reception {
    pub fn new(payload: Vec<u8>, range: f32, bearing: f32) -> Self {
        Self {
            payload,
            range,
            bearing,
        }
    }
}

/// Wheel displacement since the previous tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OdometryReading {
    /// Distance covered by the left wheel
    pub covered_distance_left: f32,
    /// Distance covered by the right wheel
    pub covered_distance_right: f32,
    /// Distance between the two wheels
    pub wheel_axis_length: f32,
}

impl OdometryReading {
    pub fn new(left: f32, right: f32, wheel_axis_length: f32) -> Self {
        Self {
            covered_distance_left: left,
            covered_distance_right: right,
            wheel_axis_length,
        }
    }
}

/// Differential drive command (left, right)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelVelocities {
    pub left: f32,
    pub right: f32,
}

impl WheelVelocities {
    pub const STOPPED: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }
}
