use pilesync_serde::{BitReader, BitWriter, Serde};

use crate::messages::MessageError;

/// Leading byte of every payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageTag {
    Text = 42,
    Movement = 43,
    CardToPile = 44,
    PileSnapshot = 45,
    DeckPosition = 51,
    SyncBatch = 52,
    RecoverBatch = 53,
    PullRequest = 54,
    OwnershipClaim = 57,
}

impl MessageTag {
    pub const ALL: [MessageTag; 9] = [
        Self::Text,
        Self::Movement,
        Self::CardToPile,
        Self::PileSnapshot,
        Self::DeckPosition,
        Self::SyncBatch,
        Self::RecoverBatch,
        Self::PullRequest,
        Self::OwnershipClaim,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_u8() == tag)
    }
}

/// A message body that travels behind its own tag
pub trait WireMessage: Serde {
    const TAG: MessageTag;
}

/// Tag byte followed by the body
pub fn write_message<M: WireMessage>(message: &M) -> Vec<u8> {
    let mut writer = BitWriter::new();
    M::TAG.as_u8().ser(&mut writer);
    message.ser(&mut writer);
    writer.to_bytes()
}

/// Reads the tag byte without decoding anything else
pub fn peek_tag(payload: &[u8]) -> Result<u8, MessageError> {
    payload.first().copied().ok_or(MessageError::EmptyPayload)
}

/// Decodes a payload as `M`, refusing payloads tagged for another message
pub fn read_message<M: WireMessage>(payload: &[u8]) -> Result<M, MessageError> {
    let found = peek_tag(payload)?;
    if found != M::TAG.as_u8() {
        return Err(MessageError::TagMismatch {
            expected: M::TAG,
            found,
        });
    }

    let mut reader = BitReader::new(payload);
    let read = u8::de(&mut reader).and_then(|_| M::de(&mut reader));
    read.map_err(|_| MessageError::Malformed { tag: M::TAG })
}
