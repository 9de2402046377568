use std::collections::BTreeMap;

use log::trace;

use crate::{
    error::PileError,
    pile::{PILE_IDS, PRIMARY_HAND},
    pile_stack::PileStack,
    types::{CardId, PeerId, PileId, UNSET_PEER},
};

/// A peer's replica of the table: one ordered stack per pile id and the
/// ownership map.
///
/// Every pile in [`PILE_IDS`] always exists, possibly empty. The store allows a
/// card to sit in two piles at once; that can happen in the middle of a
/// reconciliation and is cleared again by [`PileStore::dedupe_all`] and
/// [`PileStore::retain_only_in`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PileStore {
    piles: BTreeMap<PileId, PileStack>,
    owners: BTreeMap<CardId, PeerId>,
}

impl PileStore {
    pub fn new() -> Self {
        Self {
            piles: PILE_IDS.map(|pile| (pile, PileStack::new())).collect(),
            owners: BTreeMap::new(),
        }
    }

    // Piles

    pub fn pile(&self, pile: PileId) -> Option<&PileStack> {
        self.piles.get(&pile)
    }

    pub fn try_pile(&self, pile: PileId) -> Result<&PileStack, PileError> {
        self.piles.get(&pile).ok_or(PileError::UnknownPile { pile })
    }

    fn pile_mut(&mut self, pile: PileId) -> Result<&mut PileStack, PileError> {
        self.piles
            .get_mut(&pile)
            .ok_or(PileError::UnknownPile { pile })
    }

    pub fn piles(&self) -> impl Iterator<Item = (PileId, &PileStack)> {
        self.piles.iter().map(|(pile, stack)| (*pile, stack))
    }

    /// Number of cards in `pile`, zero for unknown piles
    pub fn count(&self, pile: PileId) -> usize {
        self.pile(pile).map_or(0, PileStack::len)
    }

    pub fn peek_top(&self, pile: PileId) -> Option<CardId> {
        self.pile(pile).and_then(PileStack::peek_top)
    }

    pub fn is_hand_empty(&self) -> bool {
        self.count(PRIMARY_HAND) == 0
    }

    /// Overwrites a pile's contents, used by authoritative snapshots
    pub fn replace_pile(&mut self, pile: PileId, stack: PileStack) -> Result<(), PileError> {
        *self.pile_mut(pile)? = stack;
        Ok(())
    }

    pub fn push_top(&mut self, pile: PileId, card: CardId) -> Result<(), PileError> {
        self.pile_mut(pile)?.push_top(card);
        Ok(())
    }

    /// Pops the top card of `from` and pushes it onto `to`
    pub fn transfer_top(&mut self, from: PileId, to: PileId) -> Result<Option<CardId>, PileError> {
        // validate the destination before popping so a failure leaves both intact
        self.try_pile(to)?;
        let Some(card) = self.pile_mut(from)?.pop_top() else {
            return Ok(None);
        };
        self.pile_mut(to)?.push_top(card);
        Ok(Some(card))
    }

    // Lookup

    /// First pile, in namespace order, that contains `card`
    pub fn pile_of(&self, card: CardId) -> Option<PileId> {
        self.piles
            .iter()
            .find(|(_, stack)| stack.contains(card))
            .map(|(pile, _)| *pile)
    }

    /// Pile and index from the bottom of `card`
    pub fn locate(&self, card: CardId) -> Option<(PileId, usize)> {
        self.piles
            .iter()
            .find_map(|(pile, stack)| stack.index_of(card).map(|index| (*pile, index)))
    }

    pub fn depth_of(&self, card: CardId, pile: PileId) -> Option<usize> {
        self.pile(pile).and_then(|stack| stack.depth_of(card))
    }

    /// How many times `card` appears across every pile
    pub fn occurrences(&self, card: CardId) -> usize {
        self.piles
            .values()
            .map(|stack| stack.iter_bottom_up().filter(|c| *c == card).count())
            .sum()
    }

    // Reconciliation primitives

    /// Takes `card` out of `from` and inserts it into `to` at `index` from the
    /// bottom. Cards above the insertion point shift up. Nothing is checked
    /// about other piles, so a card already present elsewhere stays there.
    pub fn relocate(
        &mut self,
        card: CardId,
        from: PileId,
        to: PileId,
        index: usize,
    ) -> Result<(), PileError> {
        self.try_pile(to)?;
        self.pile_mut(from)?.remove(card);
        self.pile_mut(to)?.insert_at(index, card);
        trace!("Relocated card {} from pile {} to pile {} at {}", card, from, to, index);
        Ok(())
    }

    /// Removes `card` from wherever it is and pushes it onto the top of `to`
    pub fn move_to_top(&mut self, card: CardId, to: PileId) -> Result<(), PileError> {
        self.try_pile(to)?;
        for stack in self.piles.values_mut() {
            stack.remove(card);
        }
        self.pile_mut(to)?.push_top(card);
        Ok(())
    }

    /// Removes `card` from every pile except `keep`
    pub fn retain_only_in(&mut self, card: CardId, keep: PileId) -> usize {
        let mut removed = 0;
        for (pile, stack) in self.piles.iter_mut() {
            if *pile != keep && stack.remove(card) {
                removed += 1;
            }
        }
        removed
    }

    pub fn remove_card(&mut self, card: CardId, pile: PileId) -> Result<(), PileError> {
        if self.pile_mut(pile)?.remove(card) {
            Ok(())
        } else {
            Err(PileError::CardNotInPile { card, pile })
        }
    }

    pub fn dedupe(&mut self, pile: PileId) -> Result<usize, PileError> {
        Ok(self.pile_mut(pile)?.dedupe())
    }

    /// Dedupes every pile in the namespace, returns the number of dropped entries
    pub fn dedupe_all(&mut self) -> usize {
        self.piles.values_mut().map(PileStack::dedupe).sum()
    }

    pub fn reorder(&mut self, pile: PileId, card: CardId, index: usize) -> Result<(), PileError> {
        self.pile_mut(pile)?.reorder(card, index);
        Ok(())
    }

    /// Lifts all listed cards out of `pile`, then inserts them in ascending
    /// index order so that placing one never displaces another from the list.
    pub fn reorder_many(
        &mut self,
        pile: PileId,
        placements: &[(CardId, usize)],
    ) -> Result<(), PileError> {
        let stack = self.pile_mut(pile)?;
        let mut ordered = placements.to_vec();
        ordered.sort_by_key(|(_, index)| *index);
        for (card, _) in &ordered {
            stack.remove(*card);
        }
        for (card, index) in ordered {
            stack.insert_at(index, card);
        }
        Ok(())
    }

    // Ownership

    /// Owner of `card`, [`UNSET_PEER`] if nobody has claimed it
    pub fn owner(&self, card: CardId) -> PeerId {
        self.owners.get(&card).copied().unwrap_or(UNSET_PEER)
    }

    pub fn set_owner(&mut self, card: CardId, peer: PeerId) {
        self.owners.insert(card, peer);
    }

    pub fn clear_owner(&mut self, card: CardId) {
        self.owners.remove(&card);
    }

    pub fn is_unowned(&self, card: CardId) -> bool {
        self.owner(card) == UNSET_PEER
    }

    pub fn is_owned_by(&self, card: CardId, peer: PeerId) -> bool {
        peer != UNSET_PEER && self.owner(card) == peer
    }

    /// Cards owned by `peer`, ascending
    pub fn cards_owned_by(&self, peer: PeerId) -> Vec<CardId> {
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == peer && peer != UNSET_PEER)
            .map(|(card, _)| *card)
            .collect()
    }
}

impl Default for PileStore {
    fn default() -> Self {
        Self::new()
    }
}
