use pilesync_shared::{CardId, PeerId, PileId, Pose, Vec3};

/// Host-side representation of the table: card objects and pile anchors.
///
/// The peer never renders anything itself. It asks the scene to parent cards
/// under pile anchors and reads poses back for broadcasting.
pub trait Scene {
    /// Creates the visual object for `card`. Spawning twice is a no-op.
    fn spawn_card(&mut self, card: CardId);
    fn has_card(&self, card: CardId) -> bool;
    /// World position of a pile's anchor. Hand slots resolve to the local
    /// player's hand anchors.
    fn pile_anchor(&self, pile: PileId) -> Option<Vec3>;
    fn set_pile_anchor(&mut self, pile: PileId, position: Vec3) -> bool;
    /// Parents `card` under the anchor of `pile` with the given local pose.
    /// Returns false if the card object or the anchor does not exist.
    fn attach_card(&mut self, card: CardId, pile: PileId, local: Pose) -> bool;
    /// Detaches `card` from any anchor and puts it at `pose` in world space
    fn place_card(&mut self, card: CardId, pose: Pose) -> bool;
    /// Current world pose of `card`
    fn card_pose(&self, card: CardId) -> Option<Pose>;
}

/// Session membership as seen by one peer
pub trait PeerIdentity {
    /// Id of this peer, [`pilesync_shared::UNSET_PEER`] until the session
    /// assigns one
    fn local_peer(&self) -> PeerId;
    fn session_peers(&self) -> Vec<PeerId>;
}

/// An identity that never changes once constructed
#[derive(Clone, Debug)]
pub struct FixedIdentity {
    local: PeerId,
    peers: Vec<PeerId>,
}

impl FixedIdentity {
    pub fn new(local: PeerId, peers: Vec<PeerId>) -> Self {
        Self { local, peers }
    }
}

impl PeerIdentity for FixedIdentity {
    fn local_peer(&self) -> PeerId {
        self.local
    }

    fn session_peers(&self) -> Vec<PeerId> {
        self.peers.clone()
    }
}
