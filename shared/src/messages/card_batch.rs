use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    card_state::CardState,
    messages::{
        fields::{
            read_array, read_card_ids, read_peer_id, read_pile_id, read_pile_index, write_array,
            write_card_ids, write_peer_id, write_pile_id, write_pile_index,
        },
        MessageTag, WireMessage,
    },
    pose::{Pose, Quat, Vec3},
    reconcile::Placement,
    types::{CardId, PeerId, PileId},
};

/// One card's entry in a [`CardBatch`]
#[derive(Clone, Debug, PartialEq)]
pub struct CardRecord {
    pub card: CardId,
    pub pile: PileId,
    /// Index from the bottom of `pile`, `None` if the sender had the card in
    /// no pile at all
    pub index: Option<usize>,
    pub state: CardState,
    pub pose: Pose,
}

impl CardRecord {
    pub fn placement(&self) -> Placement {
        Placement {
            card: self.card,
            pile: self.pile,
            index: self.index,
        }
    }
}

/// Everything one owner announces about its cards.
///
/// On the wire the records are split into parallel arrays, in this order:
/// card ids, piles, pile indices, states, positions, rotations, then the
/// owner. Arrays of unequal length make the payload malformed.
#[derive(Clone, Debug, PartialEq)]
pub struct CardBatch {
    pub owner: PeerId,
    pub records: Vec<CardRecord>,
}

impl CardBatch {
    pub fn new(owner: PeerId, records: Vec<CardRecord>) -> Self {
        Self { owner, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.records.iter().map(CardRecord::placement).collect()
    }
}

impl Serde for CardBatch {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let cards: Vec<CardId> = self.records.iter().map(|record| record.card).collect();
        write_card_ids(&cards, writer);
        write_array(&self.records, writer, |record, writer| {
            write_pile_id(record.pile, writer)
        });
        write_array(&self.records, writer, |record, writer| {
            write_pile_index(record.index, writer)
        });
        write_array(&self.records, writer, |record, writer| {
            record.state.ser(writer)
        });
        write_array(&self.records, writer, |record, writer| {
            record.pose.position.ser(writer)
        });
        write_array(&self.records, writer, |record, writer| {
            record.pose.rotation.ser(writer)
        });
        write_peer_id(self.owner, writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let cards = read_card_ids(reader)?;
        let piles = read_array(reader, read_pile_id)?;
        let indices = read_array(reader, read_pile_index)?;
        let states = read_array(reader, CardState::de)?;
        let positions = read_array(reader, Vec3::de)?;
        let rotations = read_array(reader, Quat::de)?;
        let owner = read_peer_id(reader)?;

        let length = cards.len();
        if [piles.len(), indices.len(), states.len(), positions.len(), rotations.len()]
            .iter()
            .any(|other| *other != length)
        {
            return Err(SerdeErr);
        }

        let records = cards
            .into_iter()
            .zip(piles)
            .zip(indices)
            .zip(states)
            .zip(positions.into_iter().zip(rotations))
            .map(|((((card, pile), index), state), (position, rotation))| CardRecord {
                card,
                pile,
                index,
                state,
                pose: Pose::new(position, rotation),
            })
            .collect();

        Ok(Self { owner, records })
    }
}

/// Periodic announcement of every card the sender owns
#[derive(Clone, Debug, PartialEq)]
pub struct SyncBatch(pub CardBatch);

impl Serde for SyncBatch {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(CardBatch::de(reader)?))
    }
}

impl WireMessage for SyncBatch {
    const TAG: MessageTag = MessageTag::SyncBatch;
}

/// Hands cards back to `owner` after a disruption
#[derive(Clone, Debug, PartialEq)]
pub struct RecoverBatch(pub CardBatch);

impl Serde for RecoverBatch {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(CardBatch::de(reader)?))
    }
}

impl WireMessage for RecoverBatch {
    const TAG: MessageTag = MessageTag::RecoverBatch;
}
