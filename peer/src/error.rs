use thiserror::Error;

use pilesync_shared::{MessageError, PileError};

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("The local peer has no identity in the session yet")]
    IdentityUnassigned,
    #[error("The deck has already been dealt on this peer")]
    AlreadyDealt,
    #[error("A handler is already registered for message tag {tag}")]
    DuplicateHandler { tag: u8 },
    #[error(transparent)]
    Pile(#[from] PileError),
}

/// Failure inside one message handler. The dispatcher logs it and carries on
/// with the next payload.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error(transparent)]
    Pile(#[from] PileError),
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Failed to access command log {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Command log is corrupt")]
    Corrupt,
}
