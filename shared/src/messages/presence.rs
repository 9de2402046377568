use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

use crate::{
    messages::{
        fields::{read_card_id, read_peer_id, read_pile_id, write_card_id, write_peer_id, write_pile_id},
        MessageTag, WireMessage,
    },
    pose::{Pose, Quat, Vec3},
    types::{CardId, PeerId, PileId},
};

// TextMessage

/// Free text. A card name here means its holder let go of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Serde for TextMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.text.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            text: String::de(reader)?,
        })
    }
}

impl WireMessage for TextMessage {
    const TAG: MessageTag = MessageTag::Text;
}

// Movement

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementKind {
    /// Pose replaces the current one
    Absolute,
    /// Position is added and rotation composed onto the current pose
    Relative,
}

/// Live pose of a named object, streamed while a card is held
#[derive(Clone, Debug, PartialEq)]
pub struct Movement {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub kind: MovementKind,
}

impl Movement {
    pub fn absolute(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            position: pose.position,
            rotation: pose.rotation,
            kind: MovementKind::Absolute,
        }
    }

    /// Pose that results from applying this movement to `current`
    pub fn apply_to(&self, current: Pose) -> Pose {
        match self.kind {
            MovementKind::Absolute => Pose::new(self.position, self.rotation),
            MovementKind::Relative => Pose::new(
                current.position + self.position,
                current.rotation.mul(self.rotation),
            ),
        }
    }
}

impl Serde for Movement {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
        let kind = match self.kind {
            MovementKind::Absolute => 0,
            MovementKind::Relative => 1,
        };
        UnsignedInteger::<1>::new(kind).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let name = String::de(reader)?;
        let position = Vec3::de(reader)?;
        let rotation = Quat::de(reader)?;
        let kind = match UnsignedInteger::<1>::de(reader)?.get() {
            0 => MovementKind::Absolute,
            1 => MovementKind::Relative,
            _ => return Err(SerdeErr),
        };
        Ok(Self {
            name,
            position,
            rotation,
            kind,
        })
    }
}

impl WireMessage for Movement {
    const TAG: MessageTag = MessageTag::Movement;
}

// CardToPile

/// Puts a card on top of a pile at every receiver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardToPile {
    pub card: CardId,
    pub pile: PileId,
    pub name: String,
}

impl Serde for CardToPile {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_card_id(self.card, writer);
        write_pile_id(self.pile, writer);
        self.name.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            card: read_card_id(reader)?,
            pile: read_pile_id(reader)?,
            name: String::de(reader)?,
        })
    }
}

impl WireMessage for CardToPile {
    const TAG: MessageTag = MessageTag::CardToPile;
}

// DeckPosition

/// Horizontal placement of a player's pile anchor
#[derive(Clone, Debug, PartialEq)]
pub struct DeckPosition {
    pub player: PeerId,
    pub pile: PileId,
    pub position: Vec3,
}

impl Serde for DeckPosition {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_peer_id(self.player, writer);
        write_pile_id(self.pile, writer);
        self.position.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            player: read_peer_id(reader)?,
            pile: read_pile_id(reader)?,
            position: Vec3::de(reader)?,
        })
    }
}

impl WireMessage for DeckPosition {
    const TAG: MessageTag = MessageTag::DeckPosition;
}
