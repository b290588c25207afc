//! Broadcast transport abstraction
//!
//! The radio is best-effort and broadcast-only: `send` never blocks and is
//! never acknowledged, `receive` drains whatever arrived since the previous
//! tick with no ordering guarantee across senders. Range is not limited here;
//! the gossip processor applies its own `comm_range` cutoff.

use crate::core::types::Reception;
use crate::error::Result;

pub mod mock;

pub use mock::{MockMedium, MockRadio};

/// Transport trait for the swarm radio
pub trait BroadcastTransport {
    /// Broadcast a payload to every peer in earshot (fire and forget)
    fn send(&mut self, payload: &[u8]) -> Result<()>;

    /// Drain everything heard since the previous call
    fn receive(&mut self) -> Result<Vec<Reception>>;
}
