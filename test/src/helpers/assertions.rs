/// Assert that no pile of a store holds the same card twice
#[macro_export]
macro_rules! assert_no_duplicates {
    ($store:expr) => {
        for (pile, stack) in $store.piles() {
            let mut seen = std::collections::BTreeSet::new();
            for card in stack.iter_bottom_up() {
                assert!(
                    seen.insert(card),
                    "pile {} holds card {} more than once",
                    pile,
                    card
                );
            }
        }
    };
}

/// Assert that two peers agree on every shared pile. Hand slots are local to
/// each player and are not compared.
#[macro_export]
macro_rules! assert_tables_agree {
    ($table:expr, $a:expr, $b:expr) => {
        for pile in pilesync_shared::PILE_IDS {
            if pilesync_shared::PileKind::of(pile).is_some_and(pilesync_shared::PileKind::is_hand) {
                continue;
            }
            assert_eq!(
                $table.peer($a).store().pile(pile),
                $table.peer($b).store().pile(pile),
                "peers {} and {} disagree on pile {}",
                $a,
                $b,
                pile
            );
        }
    };
}

/// Assert that a card is in exactly the given pile and nowhere else
#[macro_export]
macro_rules! assert_card_in {
    ($store:expr, $card:expr, $pile:expr) => {
        assert_eq!($store.occurrences($card), 1, "card {} is not in exactly one pile", $card);
        assert_eq!($store.pile_of($card), Some($pile), "card {} is in the wrong pile", $card);
    };
}
