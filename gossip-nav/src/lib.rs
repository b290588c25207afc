//! GossipNav - decentralized navigation over lossy broadcast links
//!
//! A stationary target seeds a distance vector, relays gossip it outward, and
//! seekers home in using only relayed range and bearing estimates.
//!
//! ## Per-tick pipeline
//!
//! ```text
//! odometry decay ─▶ drain receptions ─▶ one outbound decision ─▶ steering
//!  (table, best)     (gossip processor)   (adverts | control)    (seekers)
//! ```
//!
//! [`Navigator`] owns one agent's state and runs the pipeline; everything it
//! touches outside the agent goes through the traits in [`core::driver`] and
//! [`transport`].

pub mod config;
pub mod core;
pub mod error;
pub mod gossip;
pub mod navigation;
pub mod navigator;
pub mod odometry;
pub mod protocol;
pub mod table;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::NavConfig;
pub use core::types::{OdometryReading, Reception, Role, WheelVelocities};
pub use error::{Error, Result};
pub use gossip::{GossipProcessor, GossipStats, Outbound};
pub use navigation::{BestNavState, LegChoice, NavState, NavigationController, SteeringCommand};
pub use navigator::{Navigator, TickReport};
pub use odometry::{MotionDelta, OdometryIntegrator};
pub use protocol::{DecodeError, Message};
pub use table::{DistanceTable, NavTableEntry, UpdateOutcome};
pub use transport::BroadcastTransport;
