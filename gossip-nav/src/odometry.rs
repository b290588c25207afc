//! Odometry integration for the distance table
//!
//! Stored distances and bearings are relative to the agent's current pose, so
//! every tick the wheel displacement is folded into them:
//!
//! - table entries: `distance += moved`, `heading -= rotated`
//! - seeker waypoint: `best_nav_dist -= moved`, `best_nav_heading -= rotated`
//!
//! Stale entries keep growing; they are bounded only by losing later
//! freshness tie-breaks.

use crate::core::types::OdometryReading;
use crate::navigation::BestNavState;
use crate::table::DistanceTable;

/// Motion since the previous tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionDelta {
    /// Forward distance travelled
    pub distance: f32,
    /// Rotation (radians, positive = CCW)
    pub rotation: f32,
}

impl MotionDelta {
    pub fn new(distance: f32, rotation: f32) -> Self {
        Self { distance, rotation }
    }

    /// Differential drive model from wheel displacement
    ///
    /// A non-positive wheel axis yields no rotation.
    pub fn from_reading(reading: &OdometryReading) -> Self {
        let left = reading.covered_distance_left;
        let right = reading.covered_distance_right;

        let distance = (left + right) / 2.0;
        let rotation = if reading.wheel_axis_length > 0.0 {
            (right - left) / reading.wheel_axis_length
        } else {
            0.0
        };

        Self { distance, rotation }
    }

    pub fn is_zero(&self) -> bool {
        self.distance == 0.0 && self.rotation == 0.0
    }
}

/// Applies per-tick motion to an agent's navigation state
#[derive(Debug, Clone, Default)]
pub struct OdometryIntegrator {
    /// Total forward distance since creation
    travelled: f32,
    /// Total rotation since creation
    rotated: f32,
    warned_axis: bool,
}

impl OdometryIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a reading into a delta, accumulating totals
    pub fn integrate(&mut self, reading: &OdometryReading) -> MotionDelta {
        if reading.wheel_axis_length <= 0.0 && !self.warned_axis {
            log::warn!(
                "OdometryIntegrator: wheel axis length {:.3} is not positive, ignoring rotation",
                reading.wheel_axis_length
            );
            self.warned_axis = true;
        }

        let delta = MotionDelta::from_reading(reading);
        self.travelled += delta.distance;
        self.rotated += delta.rotation;
        delta
    }

    /// Decay the table and, for seekers, the current waypoint
    pub fn apply(
        &self,
        delta: &MotionDelta,
        table: &mut DistanceTable,
        best: Option<&mut BestNavState>,
    ) {
        if delta.is_zero() {
            return;
        }

        table.apply_motion(delta);
        if let Some(best) = best {
            best.apply_motion(delta);
        }
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    pub fn rotated(&self) -> f32 {
        self.rotated
    }
}
