use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    messages::{
        fields::{read_card_ids, read_peer_id, write_card_ids, write_peer_id},
        MessageTag, WireMessage,
    },
    types::{CardId, PeerId},
};

// PullRequest

/// Sent once by a late joiner, answered by `owner` with a sync batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PullRequest {
    pub owner: PeerId,
    pub requester: PeerId,
}

impl Serde for PullRequest {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_peer_id(self.owner, writer);
        write_peer_id(self.requester, writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            owner: read_peer_id(reader)?,
            requester: read_peer_id(reader)?,
        })
    }
}

impl WireMessage for PullRequest {
    const TAG: MessageTag = MessageTag::PullRequest;
}

// OwnershipClaim

/// Makes `player` the owner of `cards` at every receiver, the sender included
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipClaim {
    pub cards: Vec<CardId>,
    pub player: PeerId,
}

impl Serde for OwnershipClaim {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_card_ids(&self.cards, writer);
        write_peer_id(self.player, writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            cards: read_card_ids(reader)?,
            player: read_peer_id(reader)?,
        })
    }
}

impl WireMessage for OwnershipClaim {
    const TAG: MessageTag = MessageTag::OwnershipClaim;
}
