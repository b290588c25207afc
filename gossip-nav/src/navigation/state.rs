//! Seeker waypoint state

use crate::odometry::MotionDelta;
use crate::utils::angle_distance;

/// The seeker's currently selected path toward `nav_target_id`
///
/// `best_nav_dist`/`best_nav_heading` describe the remaining leg to the next
/// waypoint and decay with odometry. `distance_star`/`sequence_number_star`
/// remember the best advertisement accepted so far and gate replacements with
/// the same rule as the distance table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BestNavState {
    /// Distance remaining to the current waypoint
    pub best_nav_dist: f32,
    /// Heading to the current waypoint, relative to the seeker
    pub best_nav_heading: f32,
    /// Advertised distance of the best accepted path (`None` until first heard)
    pub distance_star: Option<f32>,
    /// Sequence number of the best accepted path
    pub sequence_number_star: u32,
    /// Heading recovered through the bearing handshake, used on arrival
    pub next_heading: Option<f32>,
    /// Bearing at which the last accepted advertisement arrived
    pub heading_of_last_message: Option<f32>,
}

impl BestNavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freshness gate for a new best path
    pub fn would_accept(&self, advertised_distance: f32, sequence_number: u32) -> bool {
        match self.distance_star {
            None => true,
            Some(star) => {
                advertised_distance < star && sequence_number >= self.sequence_number_star
            }
        }
    }

    /// Adopt an advertisement as the new waypoint if it passes the gate
    ///
    /// # Arguments
    /// * `advertised_distance` - Distance the relay reported to the target
    /// * `sequence_number` - Relay's freshness for that distance
    /// * `range` - Measured range to the relay
    /// * `bearing` - Measured bearing to the relay
    /// * `bearing_offset` - Bias so the seeker passes beside the relay
    ///
    /// Returns true if the waypoint changed.
    pub fn offer(
        &mut self,
        advertised_distance: f32,
        sequence_number: u32,
        range: f32,
        bearing: f32,
        bearing_offset: f32,
    ) -> bool {
        if !self.would_accept(advertised_distance, sequence_number) {
            return false;
        }

        self.distance_star = Some(advertised_distance);
        self.sequence_number_star = sequence_number;
        self.best_nav_dist = range;
        self.best_nav_heading = bearing - bearing_offset;
        self.heading_of_last_message = Some(bearing);
        true
    }

    /// Whether a response heard at `bearing` plausibly comes from the relay
    /// that produced the last accepted advertisement
    pub fn correlates(&self, bearing: f32, tolerance: f32) -> bool {
        self.heading_of_last_message
            .is_some_and(|last| angle_distance(bearing, last) <= tolerance)
    }

    /// Store a recovered heading if the response correlates
    ///
    /// Returns true if `next_heading` was updated.
    pub fn accept_response(&mut self, bearing: f32, heading: f32, tolerance: f32) -> bool {
        if !self.correlates(bearing, tolerance) {
            return false;
        }
        self.next_heading = Some(heading);
        true
    }

    /// Dead-reckon the remaining leg
    pub fn apply_motion(&mut self, delta: &MotionDelta) {
        self.best_nav_dist -= delta.distance;
        self.best_nav_heading -= delta.rotation;
    }

    /// The advertised chain ends at the target itself
    pub fn target_in_sight(&self) -> bool {
        self.distance_star == Some(0.0)
    }
}
