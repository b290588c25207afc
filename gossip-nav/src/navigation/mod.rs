//! Seeker navigation
//!
//! - [`state`]: [`BestNavState`], the currently selected waypoint and its freshness gate
//! - [`controller`]: Waypoint state machine and steering output
//! - [`explore`]: Random leg sampling used when gossip has nothing better

pub mod controller;
pub mod explore;
pub mod state;

pub use controller::{
    ControllerStep, LegChoice, NavState, NavigationController, NavigationType, SteeringCommand,
};
pub use explore::LegSampler;
pub use state::BestNavState;
