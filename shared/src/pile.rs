use std::ops::RangeInclusive;

use crate::types::PileId;

pub const FREE_PILE: PileId = -3;
pub const SECONDARY_HAND: PileId = -2;
pub const PRIMARY_HAND: PileId = -1;
pub const PLAYER_ONE_DECK: PileId = 0;
pub const PLAYER_TWO_DECK: PileId = 7;

/// Every pile id a peer keeps a stack for, in lookup order
pub const PILE_IDS: RangeInclusive<PileId> = FREE_PILE..=PLAYER_TWO_DECK;

/// What a pile is used for. Decides layout and which protocols may touch it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PileKind {
    /// Cards that are in flight or not placed anywhere
    FreePool,
    /// The hand that picks cards up
    PrimaryHand,
    SecondaryHand,
    /// A player's draw pile, rendered face down
    Deck,
    /// Outer table piles, stacked straight up
    Discard,
    /// Inner table piles, fanned out toward the player
    Table,
}

impl PileKind {
    pub fn of(pile: PileId) -> Option<Self> {
        match pile {
            FREE_PILE => Some(Self::FreePool),
            SECONDARY_HAND => Some(Self::SecondaryHand),
            PRIMARY_HAND => Some(Self::PrimaryHand),
            PLAYER_ONE_DECK | PLAYER_TWO_DECK => Some(Self::Deck),
            1 | 6 => Some(Self::Discard),
            2..=5 => Some(Self::Table),
            _ => None,
        }
    }

    /// Hand slots are local to each player and never replicated as stacks.
    pub fn is_hand(self) -> bool {
        matches!(self, Self::PrimaryHand | Self::SecondaryHand)
    }

    pub fn is_face_down(self) -> bool {
        self == Self::Deck
    }

    pub fn is_fanned(self) -> bool {
        self == Self::Table
    }

    /// Whether a held card may be put down on a pile of this kind
    pub fn accepts_placement(self) -> bool {
        matches!(self, Self::Deck | Self::Discard | Self::Table)
    }
}
