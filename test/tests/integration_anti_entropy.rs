/// Owner broadcasts heal whatever divergence a replica has picked up, even
/// over a link that loses, duplicates and reorders packets.

use std::time::{Duration, Instant};

use pilesync_peer::{FixedIdentity, Peer, PeerConfig};
use pilesync_shared::{
    write_message, CardBatch, CardRecord, CardState, Deck, Pose, Quat, SyncBatch, Vec3,
    FREE_PILE, PLAYER_ONE_DECK, PRIMARY_HAND,
};
use pilesync_test::{
    assert_card_in, assert_no_duplicates, assert_tables_agree, init_logger, LinkConditions,
    TestScene, TestTable,
};

fn record(card: u16, pile: i8, index: usize, state: CardState) -> CardRecord {
    CardRecord {
        card,
        pile,
        index: Some(index),
        state,
        pose: Pose::new(Vec3::new(0.5, 0.0, 0.5), Quat::IDENTITY),
    }
}

fn sync_payload(owner: u8, records: Vec<CardRecord>) -> Vec<u8> {
    write_message(&SyncBatch(CardBatch::new(owner, records)))
}

fn dealt_peer(id: u8) -> Peer<TestScene> {
    init_logger();
    let mut peer = Peer::new(
        PeerConfig::default(),
        TestScene::new(),
        FixedIdentity::new(id, vec![1, 2]),
    );
    peer.deal(&Deck::ordered()).unwrap();
    peer
}

#[test]
fn corrupted_replica_is_healed_by_the_next_sync() {
    init_logger();
    let mut table = TestTable::new(2);
    table.setup(&Deck::ordered());

    let store = table.peer_mut(2).store_mut();
    store.relocate(3, PLAYER_ONE_DECK, 5, 0).unwrap();
    store.push_top(2, 4).unwrap();
    store.push_top(6, 40).unwrap();

    table.run_for(Duration::from_millis(1500));

    assert_tables_agree!(table, 1, 2);
    assert_no_duplicates!(table.peer(2).store());
    assert_card_in!(table.peer(2).store(), 3, PLAYER_ONE_DECK);
    assert_eq!(table.peer(2).store().occurrences(4), 1);
}

#[test]
fn replicas_converge_over_a_hostile_link() {
    init_logger();
    let conditions = LinkConditions {
        unreliable_loss: 0.3,
        duplication: 0.2,
        reorder: true,
    };
    let mut table = TestTable::with_config(2, PeerConfig::default(), conditions, 7);
    table.setup(&Deck::ordered());

    table.pile_hit(1, PLAYER_ONE_DECK);
    table.step();
    table.pile_hit(1, 4);
    table.peer_mut(2).store_mut().push_top(1, 12).unwrap();

    table.run_for(Duration::from_secs(10));

    assert_tables_agree!(table, 1, 2);
    for peer in [1, 2] {
        assert_no_duplicates!(table.peer(peer).store());
    }
    assert_card_in!(table.peer(2).store(), 25, 4);
    assert!(table.bus().dropped() > 0);
}

#[test]
fn applying_the_same_batch_twice_changes_nothing_more() {
    let mut peer = dealt_peer(2);
    peer.store_mut().relocate(40, FREE_PILE, 3, 0).unwrap();
    let payload = sync_payload(
        1,
        vec![
            record(10, 3, 0, CardState::Pile),
            record(11, 3, 1, CardState::Pile),
            record(30, 3, 2, CardState::Pile),
            record(12, FREE_PILE, 0, CardState::Moving),
        ],
    );
    let now = Instant::now();

    peer.receive(&payload, now);
    let once = peer.store().clone();
    peer.receive(&payload, now);

    assert_eq!(peer.store(), &once);
    assert_eq!(once.pile(3).unwrap().as_slice(), &[10, 11, 30, 40]);
    assert_card_in!(once, 12, FREE_PILE);
    assert_no_duplicates!(&once);
}

#[test]
fn announced_state_and_pose_are_forced_onto_spawned_cards() {
    let mut peer = dealt_peer(2);
    let payload = sync_payload(
        1,
        vec![
            record(10, 3, 0, CardState::Pile),
            record(11, FREE_PILE, 0, CardState::Moving),
        ],
    );
    peer.receive(&payload, Instant::now());

    assert_eq!(peer.card_state(10), Some(CardState::Pile));
    assert_eq!(peer.card_state(11), Some(CardState::Moving));
    assert_eq!(peer.card(11).map(|card| card.pose().position), Some(Vec3::new(0.5, 0.0, 0.5)));
}

#[test]
fn held_cards_of_other_peers_are_in_flight_locally() {
    let mut peer = dealt_peer(2);
    let payload = sync_payload(1, vec![record(10, PRIMARY_HAND, 0, CardState::Held)]);
    peer.receive(&payload, Instant::now());

    assert_card_in!(peer.store(), 10, FREE_PILE);
    assert!(peer.store().is_hand_empty());
    assert_eq!(peer.card_state(10), Some(CardState::Moving));
}

#[test]
fn own_batches_are_ignored() {
    let mut peer = dealt_peer(2);
    let before = peer.store().clone();
    let payload = sync_payload(2, vec![record(10, 3, 0, CardState::Pile)]);
    peer.receive(&payload, Instant::now());

    assert_eq!(peer.store(), &before);
}

#[test]
fn locally_owned_cards_are_not_overwritten() {
    let mut peer = dealt_peer(2);
    peer.store_mut().set_owner(10, 2);
    let payload = sync_payload(
        1,
        vec![record(10, 3, 0, CardState::Pile), record(11, 3, 0, CardState::Pile)],
    );
    peer.receive(&payload, Instant::now());

    assert_card_in!(peer.store(), 10, FREE_PILE);
    assert_card_in!(peer.store(), 11, 3);
}
