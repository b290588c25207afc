//! Waypoint state machine for seekers
//!
//! ```text
//!              best_nav_dist <= 0
//! APPROACHING ───────────────────▶ ARRIVED_AT_WAYPOINT
//!      ▲                                   │ resolve next leg
//!      └───────────────────────────────────┘ (recovered | random | hold)
//!
//! any ──(best_nav_dist <= arrival_radius && distance* == 0)──▶ TERMINATED
//! ```
//!
//! Termination is checked first, so a seeker that overshoots a waypoint
//! advertised by the target itself still stops. Steering is only produced
//! while approaching; obstacle avoidance lives outside and may override it
//! without touching the waypoint.

use super::explore::LegSampler;
use super::state::BestNavState;
use crate::core::types::WheelVelocities;
use crate::utils::normalize_angle;
use serde::{Deserialize, Serialize};

/// Fallback policy when a waypoint is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationType {
    /// Stay where we are
    Stop,
    /// Always pick a random exploration leg
    Random,
    /// Use the handshake heading if one was recovered, otherwise explore
    #[default]
    Directional,
}

/// Seeker navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Approaching,
    ArrivedAtWaypoint,
    Terminated,
}

/// Locomotion intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringCommand {
    Straight,
    /// In-place CCW turn
    TurnLeft,
    /// In-place CW turn
    TurnRight,
    Stop,
}

impl SteeringCommand {
    /// Steer toward a relative heading
    ///
    /// Headings inside `[-go_straight_angle, go_straight_angle]` drive
    /// straight; otherwise the sign picks the turn direction.
    pub fn toward(heading: f32, go_straight_angle: f32) -> Self {
        let heading = normalize_angle(heading);
        if (-go_straight_angle..=go_straight_angle).contains(&heading) {
            SteeringCommand::Straight
        } else if heading < 0.0 {
            SteeringCommand::TurnRight
        } else {
            SteeringCommand::TurnLeft
        }
    }

    /// Wheel velocities for this command at the given wheel speed
    pub fn wheel_velocities(self, velocity: f32) -> WheelVelocities {
        match self {
            SteeringCommand::Straight => WheelVelocities::new(velocity, velocity),
            SteeringCommand::TurnLeft => WheelVelocities::new(-velocity, velocity),
            SteeringCommand::TurnRight => WheelVelocities::new(velocity, -velocity),
            SteeringCommand::Stop => WheelVelocities::STOPPED,
        }
    }
}

/// How the next leg was chosen on arrival
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegChoice {
    /// Heading recovered through the bearing handshake, distance restored to distance*
    Recovered { heading: f32, distance: f32 },
    /// Random exploration leg
    Random { heading: f32, distance: f32 },
    /// No new leg, remain stationary
    Hold,
}

/// Outcome of one controller step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerStep {
    pub state: NavState,
    pub steering: SteeringCommand,
    /// Set on ticks where a waypoint was reached
    pub leg: Option<LegChoice>,
}

/// Seeker waypoint controller
#[derive(Debug, Clone)]
pub struct NavigationController {
    navigation_type: NavigationType,
    arrival_radius: f32,
    go_straight_angle: f32,
    sampler: LegSampler,
    state: NavState,
}

impl NavigationController {
    /// Create a controller
    ///
    /// # Arguments
    /// * `navigation_type` - Fallback policy on arrival
    /// * `arrival_radius` - Termination distance once distance* is zero
    /// * `go_straight_angle` - Half-width of the go-straight window (radians)
    /// * `sampler` - Source of random legs
    pub fn new(
        navigation_type: NavigationType,
        arrival_radius: f32,
        go_straight_angle: f32,
        sampler: LegSampler,
    ) -> Self {
        log::debug!(
            "NavigationController: Initialized with type={:?}, arrival_radius={:.2}, go_straight={:.3}rad",
            navigation_type,
            arrival_radius,
            go_straight_angle
        );

        Self {
            navigation_type,
            arrival_radius,
            go_straight_angle,
            sampler,
            state: NavState::default(),
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == NavState::Terminated
    }

    /// Advance the state machine by one tick
    pub fn step(&mut self, best: &mut BestNavState) -> ControllerStep {
        if self.state == NavState::Terminated {
            return self.stopped(None);
        }

        if best.best_nav_dist <= self.arrival_radius && best.target_in_sight() {
            log::info!(
                "NavigationController: Target found ({:.2} remaining)",
                best.best_nav_dist
            );
            self.state = NavState::Terminated;
            return self.stopped(None);
        }

        if best.best_nav_dist <= 0.0 {
            let first_arrival = self.state != NavState::ArrivedAtWaypoint;
            self.state = NavState::ArrivedAtWaypoint;
            let leg = self.resolve_leg(best, first_arrival);
            return self.stopped(Some(leg));
        }

        self.state = NavState::Approaching;
        ControllerStep {
            state: self.state,
            steering: SteeringCommand::toward(best.best_nav_heading, self.go_straight_angle),
            leg: None,
        }
    }

    fn stopped(&self, leg: Option<LegChoice>) -> ControllerStep {
        ControllerStep {
            state: self.state,
            steering: SteeringCommand::Stop,
            leg,
        }
    }

    /// Pick the next leg: recovered heading, then random, then hold
    fn resolve_leg(&mut self, best: &mut BestNavState, first_arrival: bool) -> LegChoice {
        match self.navigation_type {
            NavigationType::Directional if best.next_heading.is_some() => {
                let heading = best.next_heading.take().unwrap_or_default();
                let distance = best.distance_star.unwrap_or_default();
                best.best_nav_heading = heading;
                best.best_nav_dist = distance;
                log::info!(
                    "NavigationController: Reached waypoint, using recovered heading {:.3} for {:.2}",
                    heading,
                    distance
                );
                LegChoice::Recovered { heading, distance }
            }
            NavigationType::Directional | NavigationType::Random => {
                let (heading, distance) = self.sampler.sample();
                best.best_nav_heading = heading;
                best.best_nav_dist = distance;
                log::info!(
                    "NavigationController: Reached waypoint, using random heading {:.3} for {:.2}",
                    heading,
                    distance
                );
                LegChoice::Random { heading, distance }
            }
            NavigationType::Stop => {
                if first_arrival {
                    log::info!("NavigationController: Reached waypoint, stopping");
                }
                LegChoice::Hold
            }
        }
    }
}
