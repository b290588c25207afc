//! Core abstractions shared by every agent.
//!
//! - [`types`]: Roles, radio receptions, odometry readings, wheel commands
//! - [`driver::OdometrySensor`] / [`driver::LocomotionActuator`]: Traits the
//!   host robot (or simulator) implements

pub mod driver;
pub mod types;
