/// PROPERTY-BASED TESTS: reconciliation invariants
///
/// Key invariants:
/// 1. relocate followed by dedupe never leaves a pile holding a card twice
/// 2. after a merged batch every announced card is in exactly one pile
/// 3. merging the same batch twice is the same as merging it once

use std::collections::BTreeSet;

use proptest::prelude::*;

use pilesync_shared::{merge_placements, CardId, PileId, PileStore, Placement, PILE_IDS};

const CARD_COUNT: u16 = 24;

fn pile_strategy() -> impl Strategy<Value = PileId> {
    PILE_IDS
}

fn card_strategy() -> impl Strategy<Value = CardId> {
    0..CARD_COUNT
}

/// A store with cards scattered over the piles, duplicates included
fn store_strategy() -> impl Strategy<Value = PileStore> {
    prop::collection::vec((pile_strategy(), card_strategy()), 0..60).prop_map(|entries| {
        let mut store = PileStore::new();
        for (pile, card) in entries {
            store.push_top(pile, card).unwrap();
        }
        store
    })
}

/// Placements for distinct cards, some without an index
fn batch_strategy() -> impl Strategy<Value = Vec<Placement>> {
    prop::collection::btree_map(
        card_strategy(),
        (pile_strategy(), prop::option::weighted(0.8, 0usize..30)),
        0..16,
    )
    .prop_map(|placements| {
        placements
            .into_iter()
            .map(|(card, (pile, index))| Placement { card, pile, index })
            .collect()
    })
}

fn has_duplicates(store: &PileStore) -> bool {
    store.piles().any(|(_, stack)| {
        let mut seen = BTreeSet::new();
        stack.iter_bottom_up().any(|card| !seen.insert(card))
    })
}

proptest! {
    #[test]
    fn prop_relocate_then_dedupe_leaves_no_duplicates(
        mut store in store_strategy(),
        moves in prop::collection::vec(
            (card_strategy(), pile_strategy(), pile_strategy(), 0usize..40),
            0..40,
        ),
    ) {
        for (card, from, to, index) in moves {
            store.relocate(card, from, to, index).unwrap();
        }
        store.dedupe_all();
        prop_assert!(!has_duplicates(&store));
    }

    #[test]
    fn prop_merged_cards_have_a_single_location(
        mut store in store_strategy(),
        batch in batch_strategy(),
    ) {
        merge_placements(&mut store, &batch);

        prop_assert!(!has_duplicates(&store));
        for placement in &batch {
            prop_assert_eq!(store.occurrences(placement.card), 1);
            prop_assert_eq!(store.pile_of(placement.card), Some(placement.pile));
        }
    }

    #[test]
    fn prop_merge_is_idempotent(
        mut store in store_strategy(),
        batch in batch_strategy(),
    ) {
        merge_placements(&mut store, &batch);
        let once = store.clone();
        merge_placements(&mut store, &batch);
        prop_assert_eq!(store, once);
    }

    #[test]
    fn prop_announced_order_is_reproduced_at_the_bottom(
        mut store in store_strategy(),
        cards in prop::collection::vec(card_strategy(), 0..16),
        pile in pile_strategy(),
    ) {
        let mut announced: Vec<CardId> = Vec::new();
        for card in cards {
            if !announced.contains(&card) {
                announced.push(card);
            }
        }
        let batch: Vec<Placement> = announced
            .iter()
            .enumerate()
            .map(|(index, card)| Placement { card: *card, pile, index: Some(index) })
            .collect();

        merge_placements(&mut store, &batch);

        let stack = store.pile(pile).unwrap();
        prop_assert_eq!(&stack.as_slice()[..announced.len()], announced.as_slice());
    }
}
