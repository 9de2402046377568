/// Identifies a card for the whole session, `0..52` for a standard deck
pub type CardId = u16;
/// Identifies a pile, see [`crate::PILE_IDS`] for the namespace
pub type PileId = i8;
/// A seated player's number, `1..=4`
pub type PeerId = u8;

/// Owner value of a card nobody has claimed yet
pub const UNSET_PEER: PeerId = 0;
