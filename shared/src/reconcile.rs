use std::collections::BTreeMap;

use log::warn;

use crate::{
    pile::PileKind,
    pile_store::PileStore,
    types::{CardId, PileId},
};

/// Where a remote peer says a card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub card: CardId,
    pub pile: PileId,
    /// Index from the bottom, `None` when the announcer had the card outside
    /// of any pile. Such cards go on top.
    pub index: Option<usize>,
}

/// Merges announced placements into `store`:
///
/// 1. every card is relocated from its current pile (or the announced one if
///    it is nowhere yet) into the announced pile, and stray copies in other
///    piles are dropped,
/// 2. every pile in the namespace is deduped,
/// 3. each pile's announced cards are put at their announced indices.
///
/// Placements naming an unknown pile are skipped. Returns how many placements
/// were applied. Applying the same placements again leaves the store as is.
pub fn merge_placements(store: &mut PileStore, placements: &[Placement]) -> usize {
    let valid: Vec<&Placement> = placements
        .iter()
        .filter(|placement| {
            let known = PileKind::of(placement.pile).is_some();
            if !known {
                warn!(
                    "Ignoring placement of card {} into unknown pile {}",
                    placement.card, placement.pile
                );
            }
            known
        })
        .collect();

    for placement in &valid {
        let current = store.pile_of(placement.card).unwrap_or(placement.pile);
        let index = placement.index.unwrap_or(usize::MAX);
        if current != placement.pile {
            // a stale copy already in the target pile gives way to the moved one
            store.remove_card(placement.card, placement.pile).ok();
        }
        // both piles were validated above
        if store
            .relocate(placement.card, current, placement.pile, index)
            .is_ok()
        {
            store.retain_only_in(placement.card, placement.pile);
        }
    }

    store.dedupe_all();

    let mut by_pile: BTreeMap<PileId, Vec<(CardId, usize)>> = BTreeMap::new();
    for placement in &valid {
        if let Some(index) = placement.index {
            by_pile
                .entry(placement.pile)
                .or_default()
                .push((placement.card, index));
        }
    }
    for (pile, ordered) in by_pile {
        // the pile was validated above
        let _ = store.reorder_many(pile, &ordered);
    }

    valid.len()
}
