//! # Pilesync Peer
//! A peer of a card table session. Every peer keeps a full replica of the
//! table and converges with the others through ownership claims, periodic
//! owner broadcasts, targeted recovery, a late-join pull and authoritative
//! pile snapshots. Transport, rendering and input stay with the host.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use pilesync_shared::{
        card_by_name, card_name, CardId, CardState, ChannelMode, Deck, MessageTag, PeerId,
        PileId, PileKind, PileStack, PileStore, Pose, Quat, Vec3,
    };
}

mod card;
mod command;
mod config;
mod dispatch;
mod error;
mod outbox;
mod peer;
mod pending;
mod protocol;
mod recorder;
mod scene;
mod timer;

pub use card::{CardFsm, PickupObservers};
pub use command::{Command, OutgoingPacket};
pub use config::PeerConfig;
pub use error::{HandlerError, PeerError, RecorderError};
pub use peer::Peer;
pub use pending::PendingAssignments;
pub use recorder::{CommandRecord, CommandRecorder, TIMESTAMP_EPSILON};
pub use scene::{FixedIdentity, PeerIdentity, Scene};
pub use timer::Timer;
