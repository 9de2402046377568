//! Encodings of the identifiers that appear inside message bodies.

use pilesync_serde::{
    BitReader, BitWrite, Serde, SerdeErr, SignedVariableInteger, UnsignedVariableInteger,
};

use crate::types::{CardId, PeerId, PileId};

/// Longest array accepted in any inbound message
pub const MAX_BATCH_LENGTH: usize = 256;

pub(crate) fn write_card_id(card: CardId, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<6>::new(card).ser(writer);
}

pub(crate) fn read_card_id(reader: &mut BitReader) -> Result<CardId, SerdeErr> {
    UnsignedVariableInteger::<6>::de(reader)?.try_to()
}

pub(crate) fn write_pile_id(pile: PileId, writer: &mut dyn BitWrite) {
    SignedVariableInteger::<3>::new(pile).ser(writer);
}

pub(crate) fn read_pile_id(reader: &mut BitReader) -> Result<PileId, SerdeErr> {
    SignedVariableInteger::<3>::de(reader)?.try_to()
}

pub(crate) fn write_peer_id(peer: PeerId, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<3>::new(peer).ser(writer);
}

pub(crate) fn read_peer_id(reader: &mut BitReader) -> Result<PeerId, SerdeErr> {
    UnsignedVariableInteger::<3>::de(reader)?.try_to()
}

/// `None` goes out as -1
pub(crate) fn write_pile_index(index: Option<usize>, writer: &mut dyn BitWrite) {
    let value = index.map_or(-1, |index| index as i128);
    SignedVariableInteger::<5>::new(value).ser(writer);
}

pub(crate) fn read_pile_index(reader: &mut BitReader) -> Result<Option<usize>, SerdeErr> {
    match SignedVariableInteger::<5>::de(reader)?.get() {
        -1 => Ok(None),
        value if value >= 0 => usize::try_from(value).map(Some).map_err(|_| SerdeErr),
        _ => Err(SerdeErr),
    }
}

pub(crate) fn write_length(length: usize, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<5>::new(length as i128).ser(writer);
}

/// Lengths above [`MAX_BATCH_LENGTH`] are treated as malformed input.
pub(crate) fn read_length(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let length: usize = UnsignedVariableInteger::<5>::de(reader)?.try_to()?;
    if length > MAX_BATCH_LENGTH {
        return Err(SerdeErr);
    }
    Ok(length)
}

pub(crate) fn write_card_ids(cards: &[CardId], writer: &mut dyn BitWrite) {
    write_length(cards.len(), writer);
    for card in cards {
        write_card_id(*card, writer);
    }
}

pub(crate) fn read_card_ids(reader: &mut BitReader) -> Result<Vec<CardId>, SerdeErr> {
    let length = read_length(reader)?;
    let mut cards = Vec::with_capacity(length);
    for _ in 0..length {
        cards.push(read_card_id(reader)?);
    }
    Ok(cards)
}

/// Writes a length followed by each item
pub(crate) fn write_array<T>(
    items: &[T],
    writer: &mut dyn BitWrite,
    write: impl Fn(&T, &mut dyn BitWrite),
) {
    write_length(items.len(), writer);
    for item in items {
        write(item, writer);
    }
}

pub(crate) fn read_array<T>(
    reader: &mut BitReader,
    read: impl Fn(&mut BitReader) -> Result<T, SerdeErr>,
) -> Result<Vec<T>, SerdeErr> {
    let length = read_length(reader)?;
    let mut items = Vec::with_capacity(length);
    for _ in 0..length {
        items.push(read(reader)?);
    }
    Ok(items)
}
