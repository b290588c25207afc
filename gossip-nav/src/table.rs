//! Distance table (per-agent distance vector)
//!
//! Maps a target id to the best known `(sequence, distance, heading)` for
//! reaching it. Owned by exactly one agent; entries are never evicted.
//!
//! # Freshness rule
//!
//! An advertisement heard for a known target replaces the stored entry only
//! when it is provably not worse:
//!
//! ```text
//! computed_distance < stored.distance  AND  sequence >= stored.sequence
//! ```
//!
//! A target that has never been heard is always inserted. Re-applying the
//! same advertisement is a no-op because the distance is no longer strictly
//! smaller.

use crate::error::{Error, Result};
use crate::odometry::MotionDelta;
use std::collections::BTreeMap;

/// Best known route to one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTableEntry {
    /// Freshness counter, only ever advanced by the target itself
    pub sequence_number: u32,
    /// Estimated path length to the target, grown by dead reckoning
    pub distance: f32,
    /// Bearing toward the advertising peer when the entry was set, counter-rotated by odometry
    pub heading: f32,
}

impl NavTableEntry {
    pub fn new(sequence_number: u32, distance: f32, heading: f32) -> Self {
        Self {
            sequence_number,
            distance,
            heading,
        }
    }

    /// Freshness rule against an incoming candidate
    #[inline]
    pub fn is_superseded_by(&self, sequence_number: u32, distance: f32) -> bool {
        distance < self.distance && sequence_number >= self.sequence_number
    }
}

/// Result of offering an advertisement to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First time this target was heard
    Inserted,
    /// Strictly better, not older: stored entry replaced
    Replaced,
    /// Freshness rule failed, table unchanged
    Stale,
}

impl UpdateOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, UpdateOutcome::Stale)
    }
}

/// Mapping from target id to [`NavTableEntry`]
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    entries: BTreeMap<u8, NavTableEntry>,
}

impl DistanceTable {
    /// Create an empty table (relays and seekers)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with the owner's own row at distance 0, sequence 0
    pub fn seeded(self_id: u8) -> Self {
        let mut table = Self::new();
        table
            .entries
            .insert(self_id, NavTableEntry::new(0, 0.0, 0.0));
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry without creating one
    pub fn get(&self, target_id: u8) -> Option<&NavTableEntry> {
        self.entries.get(&target_id)
    }

    /// Look up an entry, failing with [`Error::UnknownTarget`] when absent
    pub fn lookup(&self, target_id: u8) -> Result<&NavTableEntry> {
        self.get(target_id).ok_or(Error::UnknownTarget(target_id))
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &NavTableEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Apply the freshness rule for a heard advertisement
    ///
    /// # Arguments
    /// * `target_id` - Advertised target
    /// * `sequence_number` - Advertised freshness
    /// * `computed_distance` - Measured range plus advertised distance
    /// * `heading` - Bearing at which the advertisement was heard
    pub fn offer(
        &mut self,
        target_id: u8,
        sequence_number: u32,
        computed_distance: f32,
        heading: f32,
    ) -> UpdateOutcome {
        let candidate = NavTableEntry::new(sequence_number, computed_distance, heading);

        match self.entries.get_mut(&target_id) {
            None => {
                self.entries.insert(target_id, candidate);
                UpdateOutcome::Inserted
            }
            Some(stored) if stored.is_superseded_by(sequence_number, computed_distance) => {
                *stored = candidate;
                UpdateOutcome::Replaced
            }
            Some(_) => UpdateOutcome::Stale,
        }
    }

    /// Dead-reckon every entry: distances grow, headings counter-rotate
    pub fn apply_motion(&mut self, delta: &MotionDelta) {
        for entry in self.entries.values_mut() {
            entry.distance += delta.distance;
            entry.heading -= delta.rotation;
        }
    }

    /// Start a new epoch for the owner's own row
    ///
    /// Saturates at `u32::MAX` so freshness never regresses. Returns the new
    /// sequence number, or `None` if the row does not exist.
    pub fn advance_sequence(&mut self, self_id: u8) -> Option<u32> {
        let entry = self.entries.get_mut(&self_id)?;
        entry.sequence_number = entry.sequence_number.saturating_add(1);
        Some(entry.sequence_number)
    }
}
