use thiserror::Error;

use crate::messages::MessageTag;

/// Errors that can occur while decoding an inbound payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Payload had no bytes at all, so not even a tag
    #[error("Payload is empty, there is no message tag to read")]
    EmptyPayload,

    /// A decoder was handed a payload carrying another message's tag
    #[error("Decoder for {expected:?} received a payload tagged {found}")]
    TagMismatch { expected: MessageTag, found: u8 },

    /// Tag was right but the body could not be read
    #[error("Malformed {tag:?} payload: body is truncated or holds out-of-range values")]
    Malformed { tag: MessageTag },
}
