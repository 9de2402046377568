use thiserror::Error;

use crate::types::{CardId, PileId};

/// Errors raised by [`crate::PileStore`] operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PileError {
    /// Pile id outside of the namespace
    #[error("Pile {pile} does not exist. Valid piles are -3 through 7")]
    UnknownPile { pile: PileId },

    /// Card expected in a pile but not found there
    #[error("Card {card} is not in pile {pile}")]
    CardNotInPile { card: CardId, pile: PileId },
}
