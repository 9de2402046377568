/// Sync batches that arrive before the local cards exist: placement is merged
/// right away, state and pose wait for the card to be spawned.

use std::time::Duration;

use pilesync_peer::PeerConfig;
use pilesync_shared::{CardState, Deck, PLAYER_ONE_DECK, PLAYER_TWO_DECK};
use pilesync_test::{assert_tables_agree, init_logger, LinkConditions, TestTable};

/// Peer 1 deals and answers the pull of peer 2, which has not dealt yet
fn pulled_before_dealing(config: PeerConfig) -> TestTable {
    init_logger();
    let mut table = TestTable::with_config(2, config, LinkConditions::perfect(), 0);
    table.deal(1, &Deck::ordered());
    table.start(1);
    table.start(2);
    table
}

#[test]
fn placement_is_merged_before_cards_exist() {
    let table = pulled_before_dealing(PeerConfig::default());
    let peer = table.peer(2);

    assert_eq!(peer.store().count(PLAYER_ONE_DECK), 26);
    assert_eq!(peer.store().count(PLAYER_TWO_DECK), 26);
    assert_eq!(peer.pending_assignments(), 52);
    assert_eq!(peer.card_state(0), None);
}

#[test]
fn waiting_assignments_apply_once_cards_are_spawned() {
    let mut table = pulled_before_dealing(PeerConfig::default());
    table.deal(2, &Deck::ordered());
    table.step();

    let peer = table.peer(2);
    assert_eq!(peer.pending_assignments(), 0);
    assert_eq!(peer.store().count(PLAYER_ONE_DECK), 26);
    for card in Deck::ordered().cards() {
        assert_eq!(peer.card_state(*card), Some(CardState::Pile));
    }
    assert_tables_agree!(table, 1, 2);
}

#[test]
fn teardown_cancels_waiting_assignments_but_keeps_placement() {
    let mut table = pulled_before_dealing(PeerConfig::default());
    table.peer_mut(2).teardown();

    let peer = table.peer(2);
    assert_eq!(peer.pending_assignments(), 0);
    assert_eq!(peer.store().count(PLAYER_ONE_DECK), 26);
}

#[test]
fn assignments_expire_if_cards_never_appear() {
    let config = PeerConfig {
        sync_interval: Duration::from_secs(3600),
        assignment_ttl: Duration::from_secs(1),
        ..PeerConfig::default()
    };
    let mut table = pulled_before_dealing(config);
    table.run_for(Duration::from_millis(1100));

    assert_eq!(table.peer(2).pending_assignments(), 0);
}
