use log::{info, trace, warn};

use pilesync_shared::{
    read_message, CardState, ChannelMode, PeerId, PileKind, RecoverBatch, FREE_PILE,
};

use crate::{dispatch::PeerContext, error::HandlerError, protocol::sync};

/// Restates everything the local replica records as owned by `owner`, so that
/// `owner` can reclaim cards it lost track of
pub(crate) fn broadcast_recovery(context: &mut PeerContext<'_>, owner: PeerId) {
    let Some(batch) = sync::build_batch(context, owner) else {
        info!("Nothing to recover for peer {}", owner);
        return;
    };
    info!("Sending {} cards back to peer {}", batch.len(), owner);
    context.broadcast(
        &RecoverBatch(batch),
        ChannelMode::UnorderedReliable,
        false,
        false,
    );
}

/// Reclaims the announced cards, but only on the announced owner and only
/// while they are unowned. The first card that is already owned ends the
/// whole batch; the cards after it are left alone.
pub(crate) fn handle_recover_batch(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let RecoverBatch(batch) = read_message(payload)?;
    let local = context.local_peer;
    if batch.owner != local {
        trace!("Recover batch for peer {} ignored", batch.owner);
        return Ok(());
    }

    for record in &batch.records {
        let card = record.card;
        if !context.store.is_unowned(card) {
            info!(
                "Card {} is already owned by peer {}, abandoning the rest of the recover batch",
                card,
                context.store.owner(card)
            );
            return Ok(());
        }
        if PileKind::of(record.pile).is_none() {
            warn!("Recover batch puts card {} in unknown pile {}, skipping it", card, record.pile);
            continue;
        }
        context.store.set_owner(card, local);

        let (from, index) = match context.store.locate(card) {
            Some(location) => location,
            None => {
                context.store.push_top(record.pile, card)?;
                (record.pile, context.store.count(record.pile) - 1)
            }
        };
        let target = record.index.unwrap_or(usize::MAX);

        let restored = match record.state {
            CardState::Pile => {
                if from != record.pile || record.index != Some(index) {
                    context.store.relocate(card, from, record.pile, target)?;
                }
                context.with_card(card, |fsm, card_context| {
                    fsm.set_pile(record.pile);
                    fsm.ensure_state(CardState::Pile, card_context);
                })
            }
            CardState::Held | CardState::Moving => {
                context.store.relocate(card, from, record.pile, target)?;
                context.with_card(card, |fsm, card_context| {
                    fsm.set_pile(FREE_PILE);
                    fsm.ensure_state(CardState::Moving, card_context);
                })
            }
        };

        match restored {
            Some(()) => {
                context.with_card(card, |fsm, card_context| {
                    fsm.set_pose(record.pose);
                    card_context.scene.place_card(card, record.pose);
                });
            }
            None => warn!("Card {} is not spawned, recovered its placement only", card),
        }
    }
    Ok(())
}
