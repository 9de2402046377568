/// Inbound payloads that are not worth acting on never hurt a peer, and the
/// small presence messages do what they say.

use std::time::Instant;

use pilesync_peer::{FixedIdentity, Peer, PeerConfig, Scene};
use pilesync_shared::{
    write_message, CardState, CardToPile, Deck, MessageTag, Movement, Pose, Quat, TextMessage,
    Vec3, FREE_PILE, PLAYER_ONE_DECK, PRIMARY_HAND,
};
use pilesync_test::{assert_card_in, init_logger, TestScene, TestTable};

fn dealt_authority() -> Peer<TestScene> {
    init_logger();
    let mut peer = Peer::new(
        PeerConfig::default(),
        TestScene::new(),
        FixedIdentity::new(1, vec![1, 2]),
    );
    peer.deal(&Deck::ordered()).unwrap();
    peer
}

#[test]
fn garbage_is_dropped_without_side_effects() {
    let mut peer = dealt_authority();
    let before = peer.store().clone();
    let now = Instant::now();

    let mut truncated = write_message(&CardToPile {
        card: 3,
        pile: 4,
        name: "Club_5".to_string(),
    });
    truncated.truncate(3);

    peer.receive(&[], now);
    peer.receive(&[200, 1, 2], now);
    peer.receive(&truncated, now);

    assert_eq!(peer.store(), &before);
    assert!(peer.take_outgoing().is_empty());
}

#[test]
fn every_message_tag_is_handled() {
    let peer = dealt_authority();
    let tags = peer.handled_tags();
    for tag in MessageTag::ALL {
        assert!(tags.contains(&tag.as_u8()));
    }
}

#[test]
fn card_to_pile_moves_the_card_on_top() {
    let mut peer = dealt_authority();
    let payload = write_message(&CardToPile {
        card: 3,
        pile: 4,
        name: "Club_5".to_string(),
    });
    peer.receive(&payload, Instant::now());

    assert_card_in!(peer.store(), 3, 4);
    assert_eq!(peer.card_state(3), Some(CardState::Pile));
}

#[test]
fn card_to_pile_never_fills_a_hand_slot() {
    let mut peer = dealt_authority();
    let payload = write_message(&CardToPile {
        card: 3,
        pile: PRIMARY_HAND,
        name: "Club_5".to_string(),
    });
    peer.receive(&payload, Instant::now());

    assert!(peer.store().is_hand_empty());
    assert_card_in!(peer.store(), 3, PLAYER_ONE_DECK);
}

#[test]
fn movement_sets_a_resting_card_in_motion_and_text_lands_it() {
    let mut peer = dealt_authority();
    let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
    let now = Instant::now();

    // a card picked up elsewhere sits in the free pool while it moves
    let freed = CardToPile {
        card: 3,
        pile: FREE_PILE,
        name: "Club_5".to_string(),
    };
    peer.receive(&write_message(&freed), now);
    peer.receive(&write_message(&Movement::absolute("Club_5", pose)), now);
    assert_eq!(peer.card_state(3), Some(CardState::Moving));
    assert_eq!(peer.card(3).map(|card| card.pose()), Some(pose));

    peer.tick(now);
    assert_eq!(peer.scene().card_pose(3), Some(pose));

    peer.receive(&write_message(&TextMessage::new("Club_5")), now);
    assert_eq!(peer.card_state(3), Some(CardState::Pile));
}

#[test]
fn chat_text_changes_nothing() {
    let mut peer = dealt_authority();
    let before = peer.store().clone();
    peer.receive(&write_message(&TextMessage::new("good game")), Instant::now());
    assert_eq!(peer.store(), &before);
}

#[test]
fn deck_position_moves_the_anchor_everywhere_but_keeps_its_height() {
    init_logger();
    let mut table = TestTable::new(2);
    table.setup(&Deck::ordered());

    let now = table.now();
    table
        .peer_mut(2)
        .broadcast_deck_position(PLAYER_ONE_DECK, Vec3::new(1.5, 9.0, -2.0), now);
    table.exchange();

    for peer in [1, 2] {
        assert_eq!(
            table.peer(peer).scene().pile_anchor(PLAYER_ONE_DECK),
            Some(Vec3::new(1.5, 0.0, -2.0))
        );
    }
}
