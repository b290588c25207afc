//! Driver traits for the host robot

use crate::core::types::{OdometryReading, WheelVelocities};
use crate::error::Result;

/// Wheel encoder source
pub trait OdometrySensor {
    /// Wheel displacement accumulated since the previous call
    fn read(&mut self) -> Result<OdometryReading>;
}

/// Differential drive actuator
pub trait LocomotionActuator {
    /// Set individual wheel velocities
    ///
    /// # Arguments
    /// * `left` - Left wheel velocity
    /// * `right` - Right wheel velocity
    fn set_wheel_velocities(&mut self, left: f32, right: f32) -> Result<()>;

    /// Apply a [`WheelVelocities`] command
    fn apply(&mut self, command: WheelVelocities) -> Result<()> {
        self.set_wheel_velocities(command.left, command.right)
    }
}
