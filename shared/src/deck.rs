use rand::{seq::SliceRandom, Rng};

use crate::types::CardId;

pub const DECK_SIZE: usize = 52;
/// Cards dealt onto each of the two decks
pub const HALF_DECK: usize = DECK_SIZE / 2;

const SUITS: [&str; 4] = ["Club", "Diamond", "Heart", "Spade"];
const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

/// Name of a card's visual object, e.g. `Club_2` for card 0 and `Spade_A`
/// for card 51. Movement and release messages address cards by this name.
pub fn card_name(card: CardId) -> Option<String> {
    let card = card as usize;
    if card >= DECK_SIZE {
        return None;
    }
    let suit = SUITS[card / RANKS.len()];
    let rank = RANKS[card % RANKS.len()];
    Some(format!("{}_{}", suit, rank))
}

pub fn card_by_name(name: &str) -> Option<CardId> {
    let (suit, rank) = name.split_once('_')?;
    let suit = SUITS.iter().position(|candidate| *candidate == suit)?;
    let rank = RANKS.iter().position(|candidate| *candidate == rank)?;
    CardId::try_from(suit * RANKS.len() + rank).ok()
}

/// The order in which cards are dealt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// Cards `0..52` in id order
    pub fn ordered() -> Self {
        Self {
            cards: (0..DECK_SIZE as CardId).collect(),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn from_order(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// First half goes to the first deck, the rest to the second
    pub fn halves(&self) -> (&[CardId], &[CardId]) {
        self.cards.split_at(self.cards.len().min(HALF_DECK))
    }
}
