use log::{debug, info, trace, warn};

use pilesync_shared::{
    card_by_name, read_message, CardState, CardToPile, DeckPosition, Movement, PileKind,
    TextMessage, Vec3,
};

use crate::{dispatch::PeerContext, error::HandlerError};

/// Puts the card on top of the named pile and lets it rest there
pub(crate) fn handle_card_to_pile(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let message: CardToPile = read_message(payload)?;
    if PileKind::of(message.pile).is_some_and(PileKind::is_hand) {
        debug!("Ignoring card {} sent to hand slot {}", message.card, message.pile);
        return Ok(());
    }

    context.store.move_to_top(message.card, message.pile)?;
    let handled = context.with_card(message.card, |fsm, card_context| {
        fsm.set_pile(message.pile);
        fsm.change_state(CardState::Pile, card_context);
    });
    if handled.is_none() {
        trace!("Card {} is not spawned, placed in pile {} only", message.card, message.pile);
    }
    Ok(())
}

/// Streams the pose of a card someone else is holding
pub(crate) fn handle_movement(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let movement: Movement = read_message(payload)?;
    let Some(card) = card_by_name(&movement.name) else {
        trace!("Movement for unknown object {}", movement.name);
        return Ok(());
    };

    context.with_card(card, |fsm, card_context| {
        if fsm.state() == CardState::Held {
            return;
        }
        fsm.set_pose(movement.apply_to(fsm.pose()));
        if fsm.state() == CardState::Pile {
            fsm.change_state(CardState::Moving, card_context);
        }
    });
    Ok(())
}

/// A card name means the card has landed; anything else is chat
pub(crate) fn handle_text(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let message: TextMessage = read_message(payload)?;
    match card_by_name(&message.text) {
        Some(card) => {
            context.with_card(card, |fsm, card_context| {
                if fsm.state() == CardState::Moving {
                    fsm.change_state(CardState::Pile, card_context);
                }
            });
        }
        None => info!("Message: {}", message.text),
    }
    Ok(())
}

/// Moves a pile anchor horizontally, keeping its height
pub(crate) fn handle_deck_position(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let message: DeckPosition = read_message(payload)?;
    let Some(current) = context.scene.pile_anchor(message.pile) else {
        warn!("Player {} moved pile {} which has no anchor", message.player, message.pile);
        return Ok(());
    };
    let position = Vec3::new(message.position.x, current.y, message.position.z);
    context.scene.set_pile_anchor(message.pile, position);
    Ok(())
}
