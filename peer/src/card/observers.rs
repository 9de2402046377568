use std::collections::BTreeSet;

use pilesync_shared::CardId;

/// Cards currently listening for pile-hit notifications. Resting and held
/// cards listen, moving cards do not.
#[derive(Debug, Default)]
pub struct PickupObservers {
    cards: BTreeSet<CardId>,
}

impl PickupObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, card: CardId) {
        self.cards.insert(card);
    }

    pub fn detach(&mut self, card: CardId) {
        self.cards.remove(&card);
    }

    pub fn is_attached(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    /// Copy of the current listeners, so they can be notified while the set
    /// changes underneath
    pub fn snapshot(&self) -> Vec<CardId> {
        self.cards.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
