use log::debug;

use pilesync_shared::{read_message, OwnershipClaim};

use crate::{dispatch::PeerContext, error::HandlerError};

pub(crate) fn handle_ownership_claim(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let claim: OwnershipClaim = read_message(payload)?;
    for card in &claim.cards {
        context.store.set_owner(*card, claim.player);
    }
    debug!("Peer {} now owns cards {:?}", claim.player, claim.cards);
    Ok(())
}
