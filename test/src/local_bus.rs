//! In-memory broadcast transport for multi-peer tests.
//! Routes packets between peers without network I/O, optionally dropping,
//! duplicating or reordering them the way the real channels may.

use std::collections::{BTreeMap, VecDeque};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use pilesync_peer::OutgoingPacket;
use pilesync_shared::PeerId;

/// Misbehaviour of the simulated network. Reliable packets are never dropped.
#[derive(Clone, Copy, Debug)]
pub struct LinkConditions {
    /// Probability that an unreliable packet never arrives
    pub unreliable_loss: f64,
    /// Probability that a packet arrives twice
    pub duplication: f64,
    /// Whether each inbox is shuffled before delivery
    pub reorder: bool,
}

impl LinkConditions {
    pub fn perfect() -> Self {
        Self {
            unreliable_loss: 0.0,
            duplication: 0.0,
            reorder: false,
        }
    }
}

impl Default for LinkConditions {
    fn default() -> Self {
        Self::perfect()
    }
}

pub struct LocalBus {
    conditions: LinkConditions,
    rng: StdRng,
    inboxes: BTreeMap<PeerId, VecDeque<Vec<u8>>>,
    delivered: usize,
    dropped: usize,
}

impl LocalBus {
    pub fn new(peers: &[PeerId], conditions: LinkConditions, seed: u64) -> Self {
        Self {
            conditions,
            rng: StdRng::seed_from_u64(seed),
            inboxes: peers.iter().map(|peer| (*peer, VecDeque::new())).collect(),
            delivered: 0,
            dropped: 0,
        }
    }

    /// Queues `packets` for every peer except `from`
    pub fn broadcast(&mut self, from: PeerId, packets: Vec<OutgoingPacket>) {
        for packet in packets {
            for (peer, inbox) in self.inboxes.iter_mut() {
                if *peer == from {
                    continue;
                }
                if !packet.channel.is_reliable()
                    && self.rng.gen_bool(self.conditions.unreliable_loss)
                {
                    self.dropped += 1;
                    continue;
                }
                inbox.push_back(packet.payload.clone());
                if self.rng.gen_bool(self.conditions.duplication) {
                    inbox.push_back(packet.payload.clone());
                }
            }
        }
    }

    /// Everything queued for `peer`, in delivery order
    pub fn take_inbox(&mut self, peer: PeerId) -> Vec<Vec<u8>> {
        let Some(inbox) = self.inboxes.get_mut(&peer) else {
            return Vec::new();
        };
        let mut payloads: Vec<Vec<u8>> = inbox.drain(..).collect();
        if self.conditions.reorder {
            payloads.shuffle(&mut self.rng);
        }
        self.delivered += payloads.len();
        payloads
    }

    pub fn is_idle(&self) -> bool {
        self.inboxes.values().all(VecDeque::is_empty)
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
