//! Gossip processor
//!
//! Drains every reception heard this tick, folds advertisements into the
//! distance table, runs the bearing handshake for seekers, and decides the
//! single outbound transmission for the tick.
//!
//! # Message handling
//!
//! | Message | Effect |
//! |---------|--------|
//! | Advertisement | Table freshness rule on `range + distance`; seekers also gate their waypoint and answer with a BearingRequest |
//! | BearingRequest | Reply with the stored heading toward the target, relative to the direction back to the requester |
//! | BearingResponse | Seekers keep it as `next_heading` if it arrives from the bearing of the last accepted advertisement |
//!
//! # Outbound policy
//!
//! At most one transmission per tick. A control message (request or response)
//! triggered by inbound traffic wins; if several were triggered the last one
//! decided is sent. Otherwise the whole table goes out as an advertisement
//! batch, and the target opens a new epoch for its own row first.
//!
//! Receptions beyond `comm_range`, undecodable frames and frames carrying a
//! NaN or infinite distance or heading are dropped and only counted. Stale
//! updates are an expected steady state and are counted, never logged.

use crate::config::NavConfig;
use crate::core::types::{Reception, Role};
use crate::error::Error;
use crate::navigation::BestNavState;
use crate::protocol::{Message, encode_all, frames};
use crate::table::{DistanceTable, UpdateOutcome};
use crate::utils::normalize_angle;
use std::f32::consts::PI;

/// The single transmission decided for a tick
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Nothing to say (empty table, no control traffic)
    Silent,
    /// Full table, one advertisement per entry in ascending id order
    Advertisements(Vec<Message>),
    /// Ask the relay just heard for its bearing toward `target_id`
    BearingRequest { target_id: u8 },
    /// Answer a request with a relative heading
    BearingResponse { target_id: u8, heading: f32 },
}

impl Outbound {
    /// Encoded broadcast payload, `None` when silent
    pub fn payload(&self) -> Option<Vec<u8>> {
        match self {
            Outbound::Silent => None,
            Outbound::Advertisements(messages) => Some(encode_all(messages)),
            Outbound::BearingRequest { target_id } => Some(
                Message::BearingRequest {
                    target_id: *target_id,
                }
                .encode()
                .to_vec(),
            ),
            Outbound::BearingResponse { target_id, heading } => Some(
                Message::BearingResponse {
                    target_id: *target_id,
                    heading: *heading,
                }
                .encode()
                .to_vec(),
            ),
        }
    }

    /// True for request/response traffic
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Outbound::BearingRequest { .. } | Outbound::BearingResponse { .. }
        )
    }

    fn from_control(message: Message) -> Self {
        match message {
            Message::BearingRequest { target_id } => Outbound::BearingRequest { target_id },
            Message::BearingResponse { target_id, heading } => {
                Outbound::BearingResponse { target_id, heading }
            }
            Message::Advertisement { .. } => Outbound::Advertisements(vec![message]),
        }
    }
}

/// Per-tick counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GossipStats {
    /// Receptions delivered by the radio
    pub received: u32,
    /// Receptions dropped for exceeding `comm_range`
    pub out_of_range: u32,
    /// Frames dropped as undecodable or carrying non-finite values
    pub malformed: u32,
    /// Advertisements decoded
    pub advertisements: u32,
    /// Advertisements that inserted or replaced a table entry
    pub table_updates: u32,
    /// Advertisements rejected by the freshness rule
    pub stale: u32,
    /// Waypoint changes accepted by the seeker gate
    pub best_path_updates: u32,
    /// Bearing requests answered
    pub requests_answered: u32,
    /// Bearing requests for targets not in the table
    pub unknown_targets: u32,
    /// Bearing responses stored as `next_heading`
    pub responses_accepted: u32,
    /// Bearing responses ignored
    pub responses_rejected: u32,
}

/// Result of draining one tick of receptions
#[derive(Debug, Clone, PartialEq)]
pub struct GossipOutcome {
    pub outbound: Outbound,
    pub stats: GossipStats,
}

/// Message handling for one agent
#[derive(Debug, Clone)]
pub struct GossipProcessor {
    role: Role,
    self_id: u8,
    nav_target_id: u8,
    comm_range: f32,
    bearing_offset: f32,
    response_tolerance: f32,
}

impl GossipProcessor {
    pub fn from_config(config: &NavConfig) -> Self {
        Self {
            role: config.agent.role,
            self_id: config.agent.self_id,
            nav_target_id: config.agent.nav_target_id,
            comm_range: config.radio.comm_range,
            bearing_offset: config.navigation.bearing_offset,
            response_tolerance: config.navigation.response_tolerance,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Drain this tick's receptions and decide the outbound transmission
    ///
    /// `best` is the seeker's waypoint state; pass `None` for other roles.
    pub fn process(
        &self,
        receptions: &[Reception],
        table: &mut DistanceTable,
        mut best: Option<&mut BestNavState>,
    ) -> GossipOutcome {
        let mut stats = GossipStats::default();
        let mut control: Option<Message> = None;

        for reception in receptions {
            stats.received += 1;

            if !reception.range.is_finite() || reception.range > self.comm_range {
                stats.out_of_range += 1;
                continue;
            }

            for frame in frames(&reception.payload) {
                let Ok(message) = frame else {
                    stats.malformed += 1;
                    continue;
                };
                // A non-finite distance would never lose a freshness comparison
                if !message.is_finite() {
                    stats.malformed += 1;
                    continue;
                }

                let reply = match message {
                    Message::Advertisement {
                        target_id,
                        sequence,
                        distance,
                    } => self.on_advertisement(
                        target_id,
                        sequence,
                        distance,
                        reception,
                        table,
                        best.as_deref_mut(),
                        &mut stats,
                    ),
                    Message::BearingRequest { target_id } => {
                        self.on_bearing_request(target_id, reception, table, &mut stats)
                    }
                    Message::BearingResponse { target_id, heading } => {
                        self.on_bearing_response(
                            target_id,
                            heading,
                            reception,
                            best.as_deref_mut(),
                            &mut stats,
                        );
                        None
                    }
                };

                if reply.is_some() {
                    control = reply;
                }
            }
        }

        let outbound = match control {
            Some(message) => Outbound::from_control(message),
            None => self.advertise(table),
        };

        GossipOutcome { outbound, stats }
    }

    /// Routine advertisement batch for a tick without control traffic
    ///
    /// The target advances its own row's sequence first.
    pub fn advertise(&self, table: &mut DistanceTable) -> Outbound {
        if self.role.is_target()
            && let Some(sequence) = table.advance_sequence(self.self_id)
        {
            log::trace!("GossipProcessor: Target epoch {}", sequence);
        }

        if table.is_empty() {
            return Outbound::Silent;
        }

        Outbound::Advertisements(
            table
                .iter()
                .map(|(target_id, entry)| Message::Advertisement {
                    target_id,
                    sequence: entry.sequence_number,
                    distance: entry.distance,
                })
                .collect(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn on_advertisement(
        &self,
        target_id: u8,
        sequence: u32,
        distance: f32,
        reception: &Reception,
        table: &mut DistanceTable,
        best: Option<&mut BestNavState>,
        stats: &mut GossipStats,
    ) -> Option<Message> {
        stats.advertisements += 1;

        let computed_distance = reception.range + distance;
        match table.offer(target_id, sequence, computed_distance, reception.bearing) {
            UpdateOutcome::Stale => stats.stale += 1,
            outcome => {
                stats.table_updates += 1;
                log::debug!(
                    "GossipProcessor: {:?} target {} seq={} dist={:.2} bearing={:.3}",
                    outcome,
                    target_id,
                    sequence,
                    computed_distance,
                    reception.bearing
                );
            }
        }

        if !self.role.is_seeker() || target_id != self.nav_target_id {
            return None;
        }
        let best = best?;

        if !best.offer(
            distance,
            sequence,
            reception.range,
            reception.bearing,
            self.bearing_offset,
        ) {
            return None;
        }

        stats.best_path_updates += 1;
        log::info!(
            "GossipProcessor: New best path {:.2} @ {:.3} (distance*={:.2}, seq={})",
            best.best_nav_dist,
            best.best_nav_heading,
            distance,
            sequence
        );

        Some(Message::BearingRequest {
            target_id: self.nav_target_id,
        })
    }

    fn on_bearing_request(
        &self,
        target_id: u8,
        reception: &Reception,
        table: &DistanceTable,
        stats: &mut GossipStats,
    ) -> Option<Message> {
        let entry = match table.lookup(target_id) {
            Ok(entry) => entry,
            Err(Error::UnknownTarget(id)) => {
                stats.unknown_targets += 1;
                log::debug!("GossipProcessor: Bearing request for unknown target {}", id);
                return None;
            }
            Err(_) => return None,
        };

        // Direction back toward the requester
        let requester_heading = reception.bearing + PI;
        let heading = normalize_angle(entry.heading - requester_heading);

        stats.requests_answered += 1;
        log::debug!(
            "GossipProcessor: Bearing request for target {} answered with {:.3}",
            target_id,
            heading
        );

        Some(Message::BearingResponse { target_id, heading })
    }

    fn on_bearing_response(
        &self,
        target_id: u8,
        heading: f32,
        reception: &Reception,
        best: Option<&mut BestNavState>,
        stats: &mut GossipStats,
    ) {
        let accepted = self.role.is_seeker()
            && target_id == self.nav_target_id
            && best.is_some_and(|best| {
                best.accept_response(reception.bearing, heading, self.response_tolerance)
            });

        if accepted {
            stats.responses_accepted += 1;
            log::info!("GossipProcessor: Saving possible next heading {:.3}", heading);
        } else {
            stats.responses_rejected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn processor(role: Role) -> GossipProcessor {
        GossipProcessor::from_config(&NavConfig::for_role(role))
    }

    fn advert(target_id: u8, sequence: u32, distance: f32, range: f32, bearing: f32) -> Reception {
        let msg = Message::Advertisement {
            target_id,
            sequence,
            distance,
        };
        Reception::new(msg.encode().to_vec(), range, bearing)
    }

    fn request(target_id: u8, range: f32, bearing: f32) -> Reception {
        Reception::new(
            Message::BearingRequest { target_id }.encode().to_vec(),
            range,
            bearing,
        )
    }

    fn response(target_id: u8, heading: f32, range: f32, bearing: f32) -> Reception {
        Reception::new(
            Message::BearingResponse { target_id, heading }
                .encode()
                .to_vec(),
            range,
            bearing,
        )
    }

    #[test]
    fn test_relay_learns_from_target() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();

        let outcome = relay.process(&[advert(0, 0, 0.0, 5.0, 0.7)], &mut table, None);

        let entry = table.get(0).unwrap();
        assert_eq!(entry.sequence_number, 0);
        assert_relative_eq!(entry.distance, 5.0);
        assert_relative_eq!(entry.heading, 0.7);
        assert_eq!(outcome.stats.table_updates, 1);
        assert_eq!(
            outcome.outbound,
            Outbound::Advertisements(vec![Message::Advertisement {
                target_id: 0,
                sequence: 0,
                distance: 5.0
            }])
        );
    }

    #[test]
    fn test_target_advances_epoch_before_advertising() {
        let target = processor(Role::Target);
        let mut table = DistanceTable::seeded(0);

        target.process(&[], &mut table, None);
        let outcome = target.process(&[], &mut table, None);

        assert_eq!(
            outcome.outbound,
            Outbound::Advertisements(vec![Message::Advertisement {
                target_id: 0,
                sequence: 2,
                distance: 0.0
            }])
        );
    }

    #[test]
    fn test_empty_table_is_silent() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();
        assert_eq!(relay.process(&[], &mut table, None).outbound, Outbound::Silent);
    }

    #[test]
    fn test_out_of_range_discarded_before_decode() {
        let mut config = NavConfig::for_role(Role::Wanderer);
        config.radio.comm_range = 10.0;
        let relay = GossipProcessor::from_config(&config);
        let mut table = DistanceTable::new();

        let garbage = Reception::new(vec![1, 2, 3], 50.0, 0.0);
        let outcome = relay.process(&[advert(0, 0, 0.0, 10.5, 0.0), garbage], &mut table, None);

        assert!(table.is_empty());
        assert_eq!(outcome.stats.out_of_range, 2);
        assert_eq!(outcome.stats.malformed, 0);
    }

    #[test]
    fn test_reception_at_comm_range_is_kept() {
        let mut config = NavConfig::for_role(Role::Wanderer);
        config.radio.comm_range = 10.0;
        let relay = GossipProcessor::from_config(&config);
        let mut table = DistanceTable::new();

        let outcome = relay.process(&[advert(0, 0, 2.0, 10.0, 0.0)], &mut table, None);

        assert_eq!(outcome.stats.out_of_range, 0);
        assert_relative_eq!(table.get(0).unwrap().distance, 12.0);
    }

    #[test]
    fn test_infinite_range_discarded() {
        let mut config = NavConfig::for_role(Role::Wanderer);
        config.radio.comm_range = f32::INFINITY;
        let relay = GossipProcessor::from_config(&config);
        let mut table = DistanceTable::new();

        let outcome = relay.process(&[advert(0, 0, 0.0, f32::INFINITY, 0.0)], &mut table, None);

        assert!(table.is_empty());
        assert_eq!(outcome.stats.out_of_range, 1);
    }

    #[test]
    fn test_non_finite_distance_leaves_row_open() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();

        let outcome = relay.process(
            &[
                advert(0, 0, f32::NAN, 1.0, 0.0),
                advert(0, 1, f32::INFINITY, 1.0, 0.0),
            ],
            &mut table,
            None,
        );
        assert_eq!(outcome.stats.malformed, 2);
        assert_eq!(outcome.stats.advertisements, 0);
        assert!(table.is_empty());
        assert_eq!(outcome.outbound, Outbound::Silent);

        relay.process(&[advert(0, 100, 0.0, 1.0, 0.0)], &mut table, None);
        let entry = table.get(0).unwrap();
        assert_eq!(entry.sequence_number, 100);
        assert_relative_eq!(entry.distance, 1.0);
    }

    #[test]
    fn test_non_finite_distance_leaves_seeker_gate_open() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        let mut best = BestNavState::new();

        let outcome = seeker.process(
            &[advert(0, 0, f32::NAN, 3.0, 1.0)],
            &mut table,
            Some(&mut best),
        );
        assert_eq!(best.distance_star, None);
        assert_eq!(outcome.outbound, Outbound::Silent);

        let outcome = seeker.process(&[advert(0, 1, 4.0, 3.0, 1.0)], &mut table, Some(&mut best));
        assert_eq!(best.distance_star, Some(4.0));
        assert_eq!(outcome.outbound, Outbound::BearingRequest { target_id: 0 });
    }

    #[test]
    fn test_nan_response_heading_ignored() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        let mut best = BestNavState::new();
        best.offer(5.0, 0, 3.0, 1.0, 0.02);

        let outcome = seeker.process(
            &[response(0, f32::NAN, 3.0, 1.0)],
            &mut table,
            Some(&mut best),
        );

        assert_eq!(best.next_heading, None);
        assert_eq!(outcome.stats.malformed, 1);
        assert_eq!(outcome.stats.responses_accepted, 0);
    }

    #[test]
    fn test_malformed_skipped_rest_processed() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();

        let receptions = [
            Reception::new(vec![6, 0, 0, 0, 0, 0, 0, 0, 0, 0], 1.0, 0.0),
            Reception::new(vec![77, 0, 1], 1.0, 0.0),
            advert(3, 1, 2.0, 1.0, 0.0),
        ];
        let outcome = relay.process(&receptions, &mut table, None);

        assert_eq!(outcome.stats.malformed, 2);
        assert_eq!(table.len(), 1);
        assert_relative_eq!(table.get(3).unwrap().distance, 3.0);
    }

    #[test]
    fn test_batch_payload_applies_every_frame() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();

        let batch = [
            Message::Advertisement {
                target_id: 0,
                sequence: 4,
                distance: 5.0,
            },
            Message::Advertisement {
                target_id: 1,
                sequence: 2,
                distance: 8.0,
            },
        ];
        let reception = Reception::new(encode_all(&batch), 2.0, 0.0);
        relay.process(&[reception], &mut table, None);

        assert_relative_eq!(table.get(0).unwrap().distance, 7.0);
        assert_relative_eq!(table.get(1).unwrap().distance, 10.0);
    }

    #[test]
    fn test_seeker_requests_bearing_on_new_best_path() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        let mut best = BestNavState::new();

        let outcome = seeker.process(&[advert(0, 0, 5.0, 3.0, 1.0)], &mut table, Some(&mut best));

        assert_relative_eq!(table.get(0).unwrap().distance, 8.0);
        assert_relative_eq!(best.best_nav_dist, 3.0);
        assert_relative_eq!(best.best_nav_heading, 0.98);
        assert_eq!(best.heading_of_last_message, Some(1.0));
        assert_eq!(outcome.outbound, Outbound::BearingRequest { target_id: 0 });
    }

    #[test]
    fn test_seeker_ignores_other_targets() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        let mut best = BestNavState::new();

        let outcome = seeker.process(&[advert(4, 0, 5.0, 3.0, 1.0)], &mut table, Some(&mut best));

        assert!(table.get(4).is_some());
        assert_eq!(best.distance_star, None);
        assert!(matches!(outcome.outbound, Outbound::Advertisements(_)));
    }

    #[test]
    fn test_request_answered_relative_to_requester() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();
        table.offer(0, 0, 5.0, 0.5);

        let outcome = relay.process(&[request(0, 3.0, -0.2)], &mut table, None);

        let expected = normalize_angle(0.5 - (-0.2 + PI));
        match outcome.outbound {
            Outbound::BearingResponse { target_id, heading } => {
                assert_eq!(target_id, 0);
                assert_relative_eq!(heading, expected, epsilon = 1e-6);
                assert!((-PI..PI).contains(&heading));
            }
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_request_for_unknown_target_not_answered() {
        let relay = processor(Role::Wanderer);
        let mut table = DistanceTable::new();
        table.offer(0, 0, 5.0, 0.5);

        let outcome = relay.process(&[request(9, 3.0, 0.0)], &mut table, None);

        assert_eq!(outcome.stats.unknown_targets, 1);
        assert!(table.get(9).is_none());
        assert!(matches!(outcome.outbound, Outbound::Advertisements(_)));
    }

    #[test]
    fn test_response_within_tolerance_stored() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        let mut best = BestNavState::new();
        best.offer(5.0, 0, 3.0, 1.0, 0.02);

        let outcome = seeker.process(&[response(0, 0.4, 3.0, 1.05)], &mut table, Some(&mut best));

        assert_eq!(best.next_heading, Some(0.4));
        assert_eq!(outcome.stats.responses_accepted, 1);
    }

    #[test]
    fn test_response_outside_tolerance_rejected() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        let mut best = BestNavState::new();
        best.offer(5.0, 0, 3.0, 1.0, 0.02);
        best.next_heading = Some(-0.3);

        let outcome = seeker.process(&[response(0, 0.4, 3.0, 1.15)], &mut table, Some(&mut best));

        assert_eq!(best.next_heading, Some(-0.3));
        assert_eq!(outcome.stats.responses_rejected, 1);
    }

    #[test]
    fn test_last_control_message_wins() {
        let seeker = processor(Role::Seeker);
        let mut table = DistanceTable::new();
        table.offer(2, 0, 4.0, 0.1);
        let mut best = BestNavState::new();

        let outcome = seeker.process(
            &[advert(0, 0, 5.0, 3.0, 1.0), request(2, 1.0, 0.0)],
            &mut table,
            Some(&mut best),
        );

        assert!(matches!(
            outcome.outbound,
            Outbound::BearingResponse { target_id: 2, .. }
        ));
        assert!(outcome.outbound.is_control());
        // The waypoint change still happened
        assert_eq!(best.distance_star, Some(5.0));
    }

    #[test]
    fn test_outbound_payloads() {
        assert_eq!(Outbound::Silent.payload(), None);
        assert_eq!(
            Outbound::BearingRequest { target_id: 1 }.payload().unwrap(),
            vec![56, 1, 0, 0, 0, 0, 0, 0, 0, 0]
        );

        let batch = vec![
            Message::Advertisement {
                target_id: 0,
                sequence: 1,
                distance: 2.0,
            },
            Message::Advertisement {
                target_id: 1,
                sequence: 3,
                distance: 4.0,
            },
        ];
        let payload = Outbound::Advertisements(batch.clone()).payload().unwrap();
        assert_eq!(payload.len(), 20);
        let decoded: Vec<_> = frames(&payload).map(|f| f.unwrap()).collect();
        assert_eq!(decoded, batch);
    }
}
