/// Recording the commands a peer runs, saving them and replaying them on
/// another peer.

use std::time::Instant;

use pilesync_peer::{Command, CommandRecorder, FixedIdentity, Peer, PeerConfig};
use pilesync_shared::{Deck, MessageTag, Vec3, PLAYER_ONE_DECK};
use pilesync_test::{assert_card_in, init_logger, LinkConditions, TestScene, TestTable};

const TABLE_PILE: i8 = 3;

fn recorded_session() -> TestTable {
    init_logger();
    let config = PeerConfig {
        record_commands: true,
        ..PeerConfig::default()
    };
    let mut table = TestTable::with_config(2, config, LinkConditions::perfect(), 0);
    table.setup(&Deck::ordered());
    table.pile_hit(1, PLAYER_ONE_DECK);
    table.step();
    table.pile_hit(1, TABLE_PILE);
    table.step();
    table
}

fn is_tagged(command: &Command, tag: MessageTag) -> bool {
    command.payload().first() == Some(&tag.as_u8())
}

#[test]
fn nothing_is_recorded_unless_enabled() {
    init_logger();
    let mut table = TestTable::new(2);
    table.setup(&Deck::ordered());
    table.pile_hit(1, PLAYER_ONE_DECK);
    assert!(table.peer(1).recorder().is_empty());
}

#[test]
fn placement_is_recorded_as_sent_and_as_handled() {
    let table = recorded_session();
    let records = table.peer(1).recorder().records();

    assert!(records.iter().any(|record| matches!(&record.command, Command::Broadcast(_))
        && is_tagged(&record.command, MessageTag::CardToPile)));
    assert!(records.iter().any(|record| matches!(&record.command, Command::Deliver(_))
        && is_tagged(&record.command, MessageTag::CardToPile)));
    assert!(records
        .iter()
        .all(|record| !is_tagged(&record.command, MessageTag::OwnershipClaim)));
    assert!(records
        .iter()
        .all(|record| !is_tagged(&record.command, MessageTag::SyncBatch)));
}

#[test]
fn timestamps_strictly_increase() {
    let table = recorded_session();
    let records = table.peer(1).recorder().records();
    assert!(records.len() > 2);
    for pair in records.windows(2) {
        assert!(pair[0].elapsed < pair[1].elapsed);
    }
}

#[test]
fn saved_log_loads_back_identically() {
    let table = recorded_session();
    let recorder = table.peer(1).recorder();
    let path = std::env::temp_dir().join(format!("pilesync-log-{}.bin", std::process::id()));

    recorder.save(&path).unwrap();
    let mut loaded = CommandRecorder::new(false);
    loaded.load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.records(), recorder.records());
}

#[test]
fn replay_reproduces_the_recorded_placement() {
    let table = recorded_session();
    let records = table.peer(1).recorder().records().to_vec();

    let mut replica = Peer::new(
        PeerConfig::default(),
        TestScene::new(),
        FixedIdentity::new(1, vec![1]),
    );
    replica.deal(&Deck::ordered()).unwrap();
    replica.replay(&records, Instant::now());

    assert_card_in!(replica.store(), 25, TABLE_PILE);
    assert!(replica.store().is_hand_empty());
    assert!(!replica.take_outgoing().is_empty());
    assert!(replica.recorder().is_empty());
}

#[test]
fn recorded_broadcasts_follow_the_send_order() {
    init_logger();
    let config = PeerConfig {
        record_commands: true,
        ..PeerConfig::default()
    };
    let mut peer = Peer::new(config, TestScene::new(), FixedIdentity::new(1, vec![1]));
    let now = Instant::now();
    peer.deal(&Deck::ordered()).unwrap();
    peer.start(now).unwrap();
    peer.tick(now);

    // one broadcast from a card state machine, one from the peer itself
    peer.pile_hit(PLAYER_ONE_DECK, now);
    peer.broadcast_deck_position(PLAYER_ONE_DECK, Vec3::new(1.0, 0.0, 2.0), now);
    peer.pile_hit(TABLE_PILE, now);

    let sent: Vec<Vec<u8>> = peer
        .take_outgoing()
        .into_iter()
        .map(|packet| packet.payload)
        .collect();
    let recorded: Vec<&[u8]> = peer
        .recorder()
        .records()
        .iter()
        .filter(|record| matches!(&record.command, Command::Broadcast(_)))
        .map(|record| record.command.payload())
        .collect();

    let tags: Vec<u8> = recorded.iter().map(|payload| payload[0]).collect();
    assert_eq!(
        tags,
        vec![MessageTag::DeckPosition.as_u8(), MessageTag::CardToPile.as_u8()]
    );

    let mut remaining = sent.iter();
    for payload in recorded {
        assert!(
            remaining.any(|sent| sent.as_slice() == payload),
            "recorded broadcast was not sent in this order"
        );
    }
}
