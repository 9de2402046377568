/// Targeted recovery: an owner reclaims cards other peers restate for it.

use std::time::Instant;

use pilesync_peer::{FixedIdentity, Peer, PeerConfig};
use pilesync_shared::{
    write_message, CardBatch, CardRecord, CardState, Deck, Pose, RecoverBatch, FREE_PILE,
    PLAYER_TWO_DECK, UNSET_PEER,
};
use pilesync_test::{assert_card_in, init_logger, TestScene, TestTable};

fn record(card: u16, pile: i8, index: usize) -> CardRecord {
    CardRecord {
        card,
        pile,
        index: Some(index),
        state: CardState::Pile,
        pose: Pose::default(),
    }
}

fn fresh_peer(id: u8) -> Peer<TestScene> {
    init_logger();
    Peer::new(
        PeerConfig::default(),
        TestScene::new(),
        FixedIdentity::new(id, vec![1, 2, 3]),
    )
}

#[test]
fn first_owned_card_abandons_the_rest_of_the_batch() {
    let mut peer = fresh_peer(2);
    peer.store_mut().set_owner(11, 3);

    let batch = CardBatch::new(2, vec![record(10, 2, 0), record(11, 2, 1), record(12, 2, 2)]);
    peer.receive(&write_message(&RecoverBatch(batch)), Instant::now());

    let store = peer.store();
    assert_eq!(store.owner(10), 2);
    assert_card_in!(store, 10, 2);

    assert_eq!(store.owner(11), 3);
    assert_eq!(store.pile_of(11), None);

    assert_eq!(store.owner(12), UNSET_PEER);
    assert_eq!(store.pile_of(12), None);
}

#[test]
fn records_for_unknown_piles_are_skipped_without_claiming() {
    let mut peer = fresh_peer(2);
    let batch = CardBatch::new(2, vec![record(10, 20, 0), record(11, 3, 0)]);
    peer.receive(&write_message(&RecoverBatch(batch)), Instant::now());

    let store = peer.store();
    assert_eq!(store.owner(10), UNSET_PEER);
    assert_eq!(store.pile_of(10), None);

    assert_eq!(store.owner(11), 2);
    assert_card_in!(store, 11, 3);
}

#[test]
fn batches_for_another_owner_are_ignored() {
    let mut peer = fresh_peer(2);
    let batch = CardBatch::new(3, vec![record(10, 2, 0)]);
    peer.receive(&write_message(&RecoverBatch(batch)), Instant::now());

    assert_eq!(peer.store().owner(10), UNSET_PEER);
    assert_eq!(peer.store().pile_of(10), None);
}

#[test]
fn held_or_moving_cards_are_restored_in_flight() {
    let mut peer = fresh_peer(2);
    peer.deal(&Deck::ordered()).unwrap();
    for card in 0..52 {
        peer.store_mut().clear_owner(card);
    }

    let mut moving = record(7, FREE_PILE, 0);
    moving.state = CardState::Moving;
    let batch = CardBatch::new(2, vec![moving, record(8, 5, 0)]);
    peer.receive(&write_message(&RecoverBatch(batch)), Instant::now());

    assert_eq!(peer.card_state(7), Some(CardState::Moving));
    assert_eq!(peer.card_state(8), Some(CardState::Pile));
    assert_card_in!(peer.store(), 8, 5);
    assert_eq!(peer.store().owner(7), 2);
    assert_eq!(peer.store().owner(8), 2);
}

#[test]
fn owner_that_lost_track_of_a_card_gets_it_back() {
    init_logger();
    let mut table = TestTable::new(2);
    table.setup(&Deck::ordered());

    // peer 2 takes the top of the second deck and puts it on pile 4
    table.pile_hit(2, PLAYER_TWO_DECK);
    table.step();
    table.pile_hit(2, 4);
    table.step();
    assert_eq!(table.peer(1).store().owner(51), 2);

    let store = table.peer_mut(2).store_mut();
    store.clear_owner(51);
    store.relocate(51, 4, FREE_PILE, 0).unwrap();

    let now = table.now();
    table.peer_mut(1).broadcast_recovery(2, now);
    table.exchange();

    let store = table.peer(2).store();
    assert_eq!(store.owner(51), 2);
    assert_card_in!(store, 51, 4);
    assert_eq!(table.peer(2).card_state(51), Some(CardState::Pile));
}
