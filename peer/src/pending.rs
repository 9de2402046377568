use std::{
    collections::{BTreeMap, VecDeque},
    time::{Duration, Instant},
};

use log::{info, warn};

use pilesync_shared::{CardId, CardRecord};

/// Assignments that arrived before the card they describe was spawned
/// locally.
///
/// Only the latest assignment per card is kept; queueing a newer one replaces
/// the older. Entries expire after a fixed time to live.
pub struct PendingAssignments {
    waiting: BTreeMap<CardId, CardRecord>,
    ttls: VecDeque<(Instant, CardId)>,
    ttl: Duration,
}

impl PendingAssignments {
    pub fn new(ttl: Duration) -> Self {
        Self {
            waiting: BTreeMap::new(),
            ttls: VecDeque::new(),
            ttl,
        }
    }

    pub fn queue(&mut self, record: CardRecord, now: Instant) {
        let card = record.card;
        if self.waiting.insert(card, record).is_some() {
            self.remove_ttl(card);
        }
        self.ttls.push_back((now, card));
    }

    /// Drops the pending assignment for `card`, if any
    pub fn cancel(&mut self, card: CardId) -> bool {
        if self.waiting.remove(&card).is_some() {
            self.remove_ttl(card);
            return true;
        }
        false
    }

    /// Removes and returns the assignments whose card is now spawned
    pub fn collect_ready(&mut self, is_spawned: impl Fn(CardId) -> bool) -> Vec<CardRecord> {
        let ready: Vec<CardId> = self
            .waiting
            .keys()
            .copied()
            .filter(|card| is_spawned(*card))
            .collect();

        let mut output = Vec::with_capacity(ready.len());
        for card in ready {
            if let Some(record) = self.waiting.remove(&card) {
                self.remove_ttl(card);
                output.push(record);
            }
        }
        output
    }

    /// Drops every assignment older than the time to live
    pub fn expire(&mut self, now: Instant) -> usize {
        let mut expired = 0;
        while let Some((queued_at, card)) = self.ttls.front().copied() {
            if now.saturating_duration_since(queued_at) < self.ttl {
                break;
            }
            self.ttls.pop_front();
            if self.waiting.remove(&card).is_some() {
                warn!("Dropping assignment for card {}: it was never spawned", card);
                expired += 1;
            }
        }
        expired
    }

    pub fn cancel_all(&mut self) {
        if !self.waiting.is_empty() {
            info!("Cancelling {} pending card assignments", self.waiting.len());
        }
        self.waiting.clear();
        self.ttls.clear();
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    fn remove_ttl(&mut self, card: CardId) {
        if let Some(index) = self.ttls.iter().position(|(_, waiting)| *waiting == card) {
            self.ttls.remove(index);
        }
    }
}
