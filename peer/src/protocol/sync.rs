use log::{debug, trace, warn};

use pilesync_shared::{
    merge_placements, read_message, CardBatch, CardRecord, CardState, ChannelMode, PeerId,
    PileKind, Placement, SyncBatch, FREE_PILE,
};

use crate::{dispatch::PeerContext, error::HandlerError};

/// Describes every card the local store records as owned by `owner`.
///
/// Returns `None` when there is nothing to announce, or when one of the cards
/// has no state machine yet: a batch is all or nothing.
pub(crate) fn build_batch(context: &PeerContext<'_>, owner: PeerId) -> Option<CardBatch> {
    let cards = context.store.cards_owned_by(owner);
    if cards.is_empty() {
        return None;
    }

    let mut records = Vec::with_capacity(cards.len());
    for card in cards {
        let Some(fsm) = context.cards.get(&card) else {
            debug!("Card {} is not spawned yet, skipping this batch", card);
            return None;
        };
        let (pile, index) = match context.store.locate(card) {
            Some((pile, index)) => (pile, Some(index)),
            None => (FREE_PILE, None),
        };
        records.push(CardRecord {
            card,
            pile,
            index,
            state: fsm.state(),
            pose: context.scene.card_pose(card).unwrap_or(fsm.pose()),
        });
    }
    Some(CardBatch::new(owner, records))
}

/// Periodic anti-entropy broadcast of everything the local peer owns
pub(crate) fn broadcast_owned_cards(context: &mut PeerContext<'_>) {
    let Some(batch) = build_batch(context, context.local_peer) else {
        return;
    };
    trace!("Peer {} syncs {} owned cards", batch.owner, batch.len());
    context.broadcast(
        &SyncBatch(batch),
        ChannelMode::UnorderedUnreliable,
        true,
        false,
    );
}

/// Hand slots only mean something to the peer that holds the card. Remote
/// peers see a held card as in flight in the free pool.
fn localize(mut record: CardRecord) -> CardRecord {
    if PileKind::of(record.pile).is_some_and(PileKind::is_hand) {
        record.pile = FREE_PILE;
        record.index = None;
    }
    record
}

/// Merges another owner's batch into the local replica, then forces each
/// card's state machine to the announced state, deferring cards that are not
/// spawned yet.
pub(crate) fn handle_sync_batch(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let SyncBatch(batch) = read_message(payload)?;
    let local = context.local_peer;
    if batch.owner == local {
        return Ok(());
    }

    let records: Vec<CardRecord> = batch
        .records
        .into_iter()
        .filter(|record| !context.store.is_owned_by(record.card, local))
        .map(localize)
        .collect();
    let placements: Vec<Placement> = records.iter().map(CardRecord::placement).collect();
    let applied = merge_placements(context.store, &placements);
    trace!("Sync from peer {} placed {} cards", batch.owner, applied);

    for record in records {
        if context.is_spawned(record.card) {
            context.pending.cancel(record.card);
            assign_card(context, &record);
        } else {
            context.pending.queue(record, context.now);
        }
    }
    Ok(())
}

/// Forces the announced state and pose onto a spawned card. A held card is
/// moving as far as everyone else is concerned.
pub(crate) fn assign_card(context: &mut PeerContext<'_>, record: &CardRecord) {
    let assigned = context.with_card(record.card, |fsm, card_context| {
        match record.state {
            CardState::Pile => {
                fsm.set_pile(record.pile);
                fsm.ensure_state(CardState::Pile, card_context);
            }
            CardState::Held | CardState::Moving => {
                fsm.set_pile(FREE_PILE);
                fsm.ensure_state(CardState::Moving, card_context);
            }
        }
        fsm.set_pose(record.pose);
        card_context.scene.place_card(record.card, record.pose);
    });
    if assigned.is_none() {
        warn!("Card {} vanished before its assignment was applied", record.card);
    }
}

/// Applies deferred assignments whose card has been spawned since, and drops
/// the ones that waited too long
pub(crate) fn drain_pending(context: &mut PeerContext<'_>) {
    context.pending.expire(context.now);
    if context.pending.is_empty() {
        return;
    }
    let ready = {
        let cards = &*context.cards;
        let scene = &*context.scene;
        context
            .pending
            .collect_ready(|card| cards.contains_key(&card) && scene.has_card(card))
    };
    for record in ready {
        assign_card(context, &record);
    }
}
