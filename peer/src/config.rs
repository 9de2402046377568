use std::{default::Default, time::Duration};

use pilesync_shared::PeerId;

/// Contains Config properties which will be used by a Peer
#[derive(Clone, Debug)]
pub struct PeerConfig {
    /// Peer that deals the deck and streams pile snapshots
    pub authority_peer: PeerId,
    /// How often a peer broadcasts every card it owns
    pub sync_interval: Duration,
    /// How often the authority broadcasts the next pile in its snapshot cycle
    pub pile_snapshot_interval: Duration,
    /// How long a card refuses to interact with the pile it last touched
    pub pickup_cooldown: Duration,
    /// How long an assignment waits for its card to be spawned before it is
    /// dropped
    pub assignment_ttl: Duration,
    /// Vertical distance between two stacked cards
    pub card_thickness: f32,
    /// Lateral shift per stacked card on fanned table piles
    pub pile_offset: f32,
    /// Horizontal distance between two cards in a hand
    pub hand_spacing: f32,
    /// Whether recordable commands are appended to the command log
    pub record_commands: bool,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            authority_peer: 1,
            sync_interval: Duration::from_secs(1),
            pile_snapshot_interval: Duration::from_millis(200),
            pickup_cooldown: Duration::from_secs(2),
            assignment_ttl: Duration::from_secs(60),
            card_thickness: 0.0005,
            pile_offset: -0.025,
            hand_spacing: 0.025,
            record_commands: false,
        }
    }
}
