use log::info;

use pilesync_shared::{read_message, ChannelMode, PeerId, PullRequest};

use crate::{dispatch::PeerContext, error::HandlerError, protocol::sync};

/// Asks `owner` to broadcast everything it owns. Sent once by a late joiner.
pub(crate) fn send_pull_request(context: &mut PeerContext<'_>, owner: PeerId) {
    info!("Peer {} requests the table from peer {}", context.local_peer, owner);
    let request = PullRequest {
        owner,
        requester: context.local_peer,
    };
    context.broadcast(&request, ChannelMode::UnorderedReliable, false, false);
}

/// Only the addressed owner answers, with a regular sync batch
pub(crate) fn handle_pull_request(
    context: &mut PeerContext<'_>,
    payload: &[u8],
) -> Result<(), HandlerError> {
    let request: PullRequest = read_message(payload)?;
    if request.owner != context.local_peer {
        return Ok(());
    }
    info!("Peer {} pulled the table, broadcasting owned cards", request.requester);
    sync::broadcast_owned_cards(context);
    Ok(())
}
