use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    messages::{
        fields::{read_pile_id, write_pile_id},
        MessageTag, WireMessage,
    },
    pile_stack::PileStack,
    types::PileId,
};

/// Full contents of one pile, replacing the receiver's copy outright.
/// The stack travels bottom card first, see [`PileStack`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PileSnapshot {
    pub pile: PileId,
    pub stack: PileStack,
}

impl Serde for PileSnapshot {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_pile_id(self.pile, writer);
        self.stack.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            pile: read_pile_id(reader)?,
            stack: PileStack::de(reader)?,
        })
    }
}

impl WireMessage for PileSnapshot {
    const TAG: MessageTag = MessageTag::PileSnapshot;
}
