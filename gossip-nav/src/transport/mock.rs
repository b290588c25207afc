//! In-memory broadcast medium for tests and headless runs
//!
//! Agents are numbered by the caller. Links are directed and carry the range
//! and bearing at which the receiver hears the sender; a payload sent by an
//! agent is queued for every agent with a link from it. Nothing moves on its
//! own: the caller updates links as its own world model changes.

use super::BroadcastTransport;
use crate::core::types::Reception;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// How a receiver hears a sender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub range: f32,
    pub bearing: f32,
}

/// Shared broadcast medium
#[derive(Clone, Default)]
pub struct MockMedium {
    inner: Arc<Mutex<MediumInner>>,
}

#[derive(Default)]
struct MediumInner {
    /// sender -> (receiver -> link)
    links: BTreeMap<usize, BTreeMap<usize, Link>>,
    inboxes: HashMap<usize, Vec<Reception>>,
    sent: Vec<(usize, Vec<u8>)>,
    /// Agents whose radio fails every call
    offline: BTreeSet<usize>,
}

impl MockMedium {
    /// Create an empty medium
    pub fn new() -> Self {
        Self::default()
    }

    /// Radio endpoint for one agent
    pub fn radio(&self, agent: usize) -> MockRadio {
        self.inner.lock().inboxes.entry(agent).or_default();
        MockRadio {
            agent,
            medium: self.clone(),
        }
    }

    /// `receiver` hears `sender` at the given range and bearing
    pub fn set_link(&self, sender: usize, receiver: usize, range: f32, bearing: f32) {
        self.inner
            .lock()
            .links
            .entry(sender)
            .or_default()
            .insert(receiver, Link { range, bearing });
    }

    /// Symmetric range, each side with its own bearing to the other
    pub fn connect(&self, a: usize, b: usize, range: f32, bearing_at_a: f32, bearing_at_b: f32) {
        self.set_link(b, a, range, bearing_at_a);
        self.set_link(a, b, range, bearing_at_b);
    }

    /// `receiver` no longer hears `sender`
    pub fn remove_link(&self, sender: usize, receiver: usize) {
        if let Some(receivers) = self.inner.lock().links.get_mut(&sender) {
            receivers.remove(&receiver);
        }
    }

    /// Queue a reception directly, bypassing links
    pub fn inject(&self, receiver: usize, reception: Reception) {
        self.inner
            .lock()
            .inboxes
            .entry(receiver)
            .or_default()
            .push(reception);
    }

    /// Make an agent's radio fail (or recover)
    pub fn set_offline(&self, agent: usize, offline: bool) {
        let mut inner = self.inner.lock();
        if offline {
            inner.offline.insert(agent);
        } else {
            inner.offline.remove(&agent);
        }
    }

    /// Payloads broadcast by one agent, oldest first
    pub fn sent_by(&self, agent: usize) -> Vec<Vec<u8>> {
        self.inner
            .lock()
            .sent
            .iter()
            .filter(|(sender, _)| *sender == agent)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Forget the send history
    pub fn clear_sent(&self) {
        self.inner.lock().sent.clear();
    }

    /// Receptions waiting for an agent
    pub fn pending(&self, agent: usize) -> usize {
        self.inner.lock().inboxes.get(&agent).map_or(0, Vec::len)
    }

    fn check_online(&self, agent: usize) -> Result<()> {
        if self.inner.lock().offline.contains(&agent) {
            return Err(Error::Transport(format!("radio {} is offline", agent)));
        }
        Ok(())
    }

    fn broadcast(&self, sender: usize, payload: &[u8]) {
        let mut inner = self.inner.lock();
        let deliveries: Vec<(usize, Link)> = inner
            .links
            .get(&sender)
            .map(|receivers| receivers.iter().map(|(id, link)| (*id, *link)).collect())
            .unwrap_or_default();

        for (receiver, link) in deliveries {
            inner
                .inboxes
                .entry(receiver)
                .or_default()
                .push(Reception::new(payload.to_vec(), link.range, link.bearing));
        }
        inner.sent.push((sender, payload.to_vec()));
    }

    fn drain(&self, agent: usize) -> Vec<Reception> {
        self.inner
            .lock()
            .inboxes
            .get_mut(&agent)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

/// One agent's endpoint on a [`MockMedium`]
#[derive(Clone)]
pub struct MockRadio {
    agent: usize,
    medium: MockMedium,
}

impl MockRadio {
    pub fn agent(&self) -> usize {
        self.agent
    }
}

impl BroadcastTransport for MockRadio {
    fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.medium.check_online(self.agent)?;
        self.medium.broadcast(self.agent, payload);
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<Reception>> {
        self.medium.check_online(self.agent)?;
        Ok(self.medium.drain(self.agent))
    }
}
