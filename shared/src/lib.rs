//! # Pilesync Shared
//! Card, pile and wire message types shared by every pilesync peer.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use pilesync_serde::{
    BitReader, BitWrite, BitWriter, Serde, SerdeErr, SerdeInteger, SignedInteger,
    SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};

mod card_state;
mod deck;
mod error;
mod messages;
mod pile;
mod pile_stack;
mod pile_store;
mod pose;
mod reconcile;
mod types;

pub use card_state::CardState;
pub use deck::{card_by_name, card_name, Deck, DECK_SIZE, HALF_DECK};
pub use error::PileError;
pub use messages::{
    peek_tag, read_message, write_message, CardBatch, CardRecord, CardToPile, ChannelMode,
    DeckPosition, MessageError, MessageTag, Movement, MovementKind, OwnershipClaim,
    PileSnapshot, PullRequest, RecoverBatch, SyncBatch, TextMessage, WireMessage,
    MAX_BATCH_LENGTH,
};
pub use pile::{
    PileKind, FREE_PILE, PILE_IDS, PLAYER_ONE_DECK, PLAYER_TWO_DECK, PRIMARY_HAND, SECONDARY_HAND,
};
pub use pile_stack::PileStack;
pub use pile_store::PileStore;
pub use pose::{Pose, Quat, Vec3};
pub use reconcile::{merge_placements, Placement};
pub use types::{CardId, PeerId, PileId, UNSET_PEER};
