use log::{debug, trace};

use pilesync_shared::{
    read_message, CardId, ChannelMode, PileId, PileKind, PileSnapshot, PileStack, FREE_PILE,
    PRIMARY_HAND, SECONDARY_HAND,
};

use crate::{dispatch::PeerContext, error::HandlerError};

/// Last pile of the snapshot cycle before it wraps back to the free pool
const LAST_SNAPSHOT_PILE: PileId = 6;

/// Walks the piles the authority streams, one per snapshot interval.
/// Hand slots are skipped: they are local to each player.
#[derive(Debug)]
pub(crate) struct SnapshotCursor {
    next: PileId,
}

impl SnapshotCursor {
    pub fn new() -> Self {
        Self { next: FREE_PILE }
    }

    /// Returns the pile to broadcast now and moves on to the next one
    pub fn advance(&mut self) -> PileId {
        let current = self.next;
        let mut next = current;
        loop {
            next = if next >= LAST_SNAPSHOT_PILE {
                FREE_PILE
            } else {
                next + 1
            };
            if !PileKind::of(next).is_some_and(PileKind::is_hand) {
                break;
            }
        }
        self.next = next;
        current
    }
}

pub(crate) fn broadcast_pile(context: &mut PeerContext<'_>, pile: PileId) {
    let Some(stack) = context.store.pile(pile).cloned() else {
        return;
    };
    trace!("Broadcasting snapshot of pile {} ({} cards)", pile, stack.len());
    context.broadcast(
        &PileSnapshot { pile, stack },
        ChannelMode::UnorderedUnreliable,
        true,
        true,
    );
}

/// Replaces the local copy of the pile outright. Cards the local player is
/// holding stay in the hand: the authority only knows them as in flight.
pub(crate) fn handle_pile_snapshot(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let snapshot: PileSnapshot = read_message(payload)?;
    if PileKind::of(snapshot.pile).is_some_and(PileKind::is_hand) {
        debug!("Ignoring snapshot of hand slot {}", snapshot.pile);
        return Ok(());
    }

    let local = context.local_peer;
    let store = &*context.store;
    let held_here = |card: CardId| {
        store.is_owned_by(card, local)
            && [PRIMARY_HAND, SECONDARY_HAND]
                .into_iter()
                .any(|hand| store.pile(hand).is_some_and(|stack| stack.contains(card)))
    };
    let stack = if snapshot.stack.iter_bottom_up().any(held_here) {
        debug!("Keeping held cards out of the snapshot of pile {}", snapshot.pile);
        PileStack::from_bottom_up(
            snapshot
                .stack
                .iter_bottom_up()
                .filter(|card| !held_here(*card)),
        )
    } else {
        snapshot.stack
    };
    context.store.replace_pile(snapshot.pile, stack)?;
    Ok(())
}
