mod card_batch;
mod channel;
mod control;
mod error;
mod fields;
mod pile_snapshot;
mod presence;
mod tag;

pub use card_batch::{CardBatch, CardRecord, RecoverBatch, SyncBatch};
pub use channel::ChannelMode;
pub use control::{OwnershipClaim, PullRequest};
pub use error::MessageError;
pub use fields::MAX_BATCH_LENGTH;
pub use pile_snapshot::PileSnapshot;
pub use presence::{CardToPile, DeckPosition, Movement, MovementKind, TextMessage};
pub use tag::{peek_tag, read_message, write_message, MessageTag, WireMessage};

pub(crate) use fields::{read_card_ids, write_card_ids};
