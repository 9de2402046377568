use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    messages::{read_card_ids, write_card_ids},
    types::CardId,
};

/// Ordered contents of one pile.
///
/// Cards are stored bottom to top: index `0` is the bottom card and the last
/// element is the top, the card a pickup takes. All indices taken or returned
/// by this type count from the bottom. The wire encoding uses the same order,
/// so decoding a snapshot reproduces the pop order without any reversal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PileStack {
    cards: Vec<CardId>,
}

impl PileStack {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Builds a stack from cards listed bottom first
    pub fn from_bottom_up<I: IntoIterator<Item = CardId>>(cards: I) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    pub fn push_top(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub fn pop_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Inserts `card` so that it ends up at `index` from the bottom, shifting
    /// the cards above it up. An index past the top pushes onto the top.
    pub fn insert_at(&mut self, index: usize, card: CardId) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Removes every occurrence of `card`, keeping the order of the rest.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, card: CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|existing| *existing != card);
        self.cards.len() != before
    }

    /// Lifts `card` out and reinserts it at `index` from the bottom. A card
    /// that was not in the stack is inserted all the same.
    pub fn reorder(&mut self, card: CardId, index: usize) {
        self.remove(card);
        self.insert_at(index, card);
    }

    /// Keeps the first occurrence of every card, returns how many duplicates
    /// were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.cards.len();
        let mut seen = Vec::with_capacity(before);
        self.cards.retain(|card| {
            if seen.contains(card) {
                false
            } else {
                seen.push(*card);
                true
            }
        });
        before - self.cards.len()
    }

    /// Position counted from the bottom of the first occurrence of `card`
    pub fn index_of(&self, card: CardId) -> Option<usize> {
        self.cards.iter().position(|existing| *existing == card)
    }

    /// Position counted from the top, `0` being the top card
    pub fn depth_of(&self, card: CardId) -> Option<usize> {
        self.index_of(card).map(|index| self.cards.len() - index - 1)
    }

    pub fn iter_bottom_up(&self) -> impl DoubleEndedIterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    /// Pop order
    pub fn iter_top_down(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().rev().copied()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

// Card ids go out as variable integers, bottom card first.
impl Serde for PileStack {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_card_ids(&self.cards, writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            cards: read_card_ids(reader)?,
        })
    }
}
