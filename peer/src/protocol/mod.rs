//! Message handlers and the broadcasts that feed them.
//!
//! Every inbound payload goes through the handler registered for its tag in
//! [`default_handlers`]. The `record` flag of a registration decides whether
//! deliveries to that handler end up in the command log.

mod ownership;
mod presence;
mod pull;
mod recover;
mod snapshot;
mod sync;

pub(crate) use pull::send_pull_request;
pub(crate) use recover::broadcast_recovery;
pub(crate) use snapshot::{broadcast_pile, SnapshotCursor};
pub(crate) use sync::{broadcast_owned_cards, drain_pending};

use pilesync_shared::MessageTag;

use crate::dispatch::HandlerMap;

pub(crate) fn default_handlers() -> HandlerMap {
    let mut handlers = HandlerMap::new();
    handlers.register(MessageTag::Text, presence::handle_text, true);
    handlers.register(MessageTag::Movement, presence::handle_movement, true);
    handlers.register(MessageTag::CardToPile, presence::handle_card_to_pile, true);
    handlers.register(MessageTag::PileSnapshot, snapshot::handle_pile_snapshot, true);
    handlers.register(MessageTag::DeckPosition, presence::handle_deck_position, true);
    handlers.register(MessageTag::SyncBatch, sync::handle_sync_batch, false);
    handlers.register(MessageTag::RecoverBatch, recover::handle_recover_batch, false);
    handlers.register(MessageTag::PullRequest, pull::handle_pull_request, false);
    handlers.register(MessageTag::OwnershipClaim, ownership::handle_ownership_claim, false);
    handlers
}
