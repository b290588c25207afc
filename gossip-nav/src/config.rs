//! Configuration for a navigating agent
//!
//! Loaded from TOML once at start-up and static for the run. Every field has a
//! default, so a file only needs to name what differs:
//!
//! ```toml
//! [agent]
//! role = "seeker"
//! nav_target_id = 0
//!
//! [radio]
//! comm_range = 120.0
//! ```
//!
//! # Default Values
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | role | wanderer |
//! | comm_range | 300.0 |
//! | navigation_type | directional |
//! | bearing_offset | 0.02 rad |
//! | response_tolerance | 0.1 rad |
//! | arrival_radius | 15.0 |
//! | exploration_mean_distance | 150.0 |
//! | go_straight_angle_deg | 10.0 |
//! | wheel_velocity | 2.5 |

use crate::core::types::Role;
use crate::error::{Error, Result};
use crate::navigation::NavigationType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level agent configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NavConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub radio: RadioConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub steering: SteeringConfig,
}

/// Identity and role
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AgentConfig {
    /// What this agent does
    #[serde(default)]
    pub role: Role,

    /// Id the target seeds for its own table row
    #[serde(default)]
    pub self_id: u8,

    /// Target id a seeker homes in on
    #[serde(default)]
    pub nav_target_id: u8,
}

/// Radio settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RadioConfig {
    /// Receptions measured beyond this range are discarded before decoding
    #[serde(default = "default_comm_range")]
    pub comm_range: f32,
}

fn default_comm_range() -> f32 {
    300.0
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            comm_range: default_comm_range(),
        }
    }
}

/// Seeker navigation tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NavigationConfig {
    /// Fallback policy on reaching a waypoint
    #[serde(default)]
    pub navigation_type: NavigationType,

    /// Subtracted from the relay bearing so the seeker passes beside it (radians)
    #[serde(default = "default_bearing_offset")]
    pub bearing_offset: f32,

    /// Maximum bearing difference for a response to count as a reply (radians)
    #[serde(default = "default_response_tolerance")]
    pub response_tolerance: f32,

    /// Remaining distance at which a target-advertised waypoint counts as found
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f32,

    /// Mean length of random exploration legs
    #[serde(default = "default_exploration_mean_distance")]
    pub exploration_mean_distance: f32,

    /// Seed for exploration legs (0 = random each run)
    #[serde(default)]
    pub random_seed: u64,
}

fn default_bearing_offset() -> f32 {
    0.02
}
fn default_response_tolerance() -> f32 {
    0.1
}
fn default_arrival_radius() -> f32 {
    15.0
}
fn default_exploration_mean_distance() -> f32 {
    150.0
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            navigation_type: NavigationType::default(),
            bearing_offset: default_bearing_offset(),
            response_tolerance: default_response_tolerance(),
            arrival_radius: default_arrival_radius(),
            exploration_mean_distance: default_exploration_mean_distance(),
            random_seed: 0,
        }
    }
}

/// Steering output settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SteeringConfig {
    /// Half-width of the go-straight window (degrees)
    #[serde(default = "default_go_straight_angle_deg")]
    pub go_straight_angle_deg: f32,

    /// Wheel speed for straight motion and in-place turns
    #[serde(default = "default_wheel_velocity")]
    pub wheel_velocity: f32,
}

fn default_go_straight_angle_deg() -> f32 {
    10.0
}
fn default_wheel_velocity() -> f32 {
    2.5
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            go_straight_angle_deg: default_go_straight_angle_deg(),
            wheel_velocity: default_wheel_velocity(),
        }
    }
}

impl SteeringConfig {
    /// Go-straight half-width in radians
    pub fn go_straight_angle(&self) -> f32 {
        self.go_straight_angle_deg.to_radians()
    }
}

impl NavConfig {
    /// Defaults for the given role
    pub fn for_role(role: Role) -> Self {
        let mut config = Self::default();
        config.agent.role = role;
        config
    }

    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use gossip_nav::config::NavConfig;
    ///
    /// let config = NavConfig::from_file("seeker.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: NavConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the protocol cannot work with
    pub fn validate(&self) -> Result<()> {
        let radio = &self.radio;
        if radio.comm_range.is_nan() || radio.comm_range <= 0.0 {
            return Err(Error::Config(format!(
                "radio.comm_range must be positive, got {}",
                radio.comm_range
            )));
        }

        let nav = &self.navigation;
        for (name, value) in [
            ("navigation.bearing_offset", nav.bearing_offset),
            ("navigation.response_tolerance", nav.response_tolerance),
            ("navigation.arrival_radius", nav.arrival_radius),
            ("steering.go_straight_angle_deg", self.steering.go_straight_angle_deg),
            ("steering.wheel_velocity", self.steering.wheel_velocity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if !(nav.exploration_mean_distance.is_finite() && nav.exploration_mean_distance > 0.0) {
            return Err(Error::Config(format!(
                "navigation.exploration_mean_distance must be positive, got {}",
                nav.exploration_mean_distance
            )));
        }

        Ok(())
    }
}
