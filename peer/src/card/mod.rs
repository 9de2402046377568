mod context;
mod fsm;
mod observers;

pub(crate) use context::CardContext;
pub use fsm::CardFsm;
pub use observers::PickupObservers;

use std::collections::BTreeMap;

use pilesync_shared::CardId;

pub(crate) type CardTable = BTreeMap<CardId, CardFsm>;
