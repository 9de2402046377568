use std::time::Instant;

use log::{info, warn};

use pilesync_shared::{
    CardId, CardState, ChannelMode, Deck, DeckPosition, PeerId, PileId, PileStore, Vec3,
    FREE_PILE, PLAYER_ONE_DECK, PLAYER_TWO_DECK, UNSET_PEER,
};

use crate::{
    card::{CardFsm, CardTable, PickupObservers},
    command::OutgoingPacket,
    config::PeerConfig,
    dispatch::{HandlerMap, PeerContext},
    error::PeerError,
    outbox::Outbox,
    pending::PendingAssignments,
    protocol::{self, SnapshotCursor},
    recorder::{CommandRecord, CommandRecorder},
    scene::{PeerIdentity, Scene},
    timer::Timer,
};

/// One participant of a card table session.
///
/// The host drives it from a single thread: feed it received payloads with
/// [`Peer::receive`] and pile-hit notifications with [`Peer::pile_hit`], call
/// [`Peer::tick`] at a fixed rate, and hand whatever
/// [`Peer::take_outgoing`] returns to the transport.
pub struct Peer<S: Scene> {
    config: PeerConfig,
    identity: Box<dyn PeerIdentity>,
    scene: S,
    store: PileStore,
    cards: CardTable,
    observers: PickupObservers,
    handlers: HandlerMap,
    recorder: CommandRecorder,
    outbox: Outbox,
    pending: PendingAssignments,
    sync_timer: Timer,
    snapshot_timer: Timer,
    snapshot_cursor: SnapshotCursor,
    started: bool,
}

impl<S: Scene> Peer<S> {
    pub fn new(config: PeerConfig, scene: S, identity: impl PeerIdentity + 'static) -> Self {
        Self {
            identity: Box::new(identity),
            scene,
            store: PileStore::new(),
            cards: CardTable::new(),
            observers: PickupObservers::new(),
            handlers: protocol::default_handlers(),
            recorder: CommandRecorder::new(config.record_commands),
            outbox: Outbox::new(),
            pending: PendingAssignments::new(config.assignment_ttl),
            sync_timer: Timer::new(config.sync_interval),
            snapshot_timer: Timer::new(config.pile_snapshot_interval),
            snapshot_cursor: SnapshotCursor::new(),
            started: false,
            config,
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.identity.local_peer()
    }

    pub fn is_authority(&self) -> bool {
        self.local_peer() == self.config.authority_peer
    }

    fn context(&mut self, now: Instant) -> PeerContext<'_> {
        PeerContext {
            config: &self.config,
            now,
            local_peer: self.identity.local_peer(),
            handlers: &self.handlers,
            store: &mut self.store,
            cards: &mut self.cards,
            observers: &mut self.observers,
            scene: &mut self.scene,
            outbox: &mut self.outbox,
            recorder: &mut self.recorder,
            pending: &mut self.pending,
        }
    }

    fn require_identity(&self) -> Result<PeerId, PeerError> {
        match self.local_peer() {
            UNSET_PEER => Err(PeerError::IdentityUnassigned),
            local => Ok(local),
        }
    }

    // Lifecycle

    /// Spawns every card of `deck`.
    ///
    /// The authority splits the deck between the two player decks. Everyone
    /// else parks the cards it has not heard about yet in the free pool and
    /// waits for the authority's batches to place them. Cards nobody has
    /// claimed start out owned by the authority.
    pub fn deal(&mut self, deck: &Deck) -> Result<(), PeerError> {
        let local = self.require_identity()?;
        if deck.cards().iter().any(|card| self.cards.contains_key(card)) {
            return Err(PeerError::AlreadyDealt);
        }

        if self.is_authority() {
            let (first, second) = deck.halves();
            for card in first {
                self.store.push_top(PLAYER_ONE_DECK, *card)?;
            }
            for card in second {
                self.store.push_top(PLAYER_TWO_DECK, *card)?;
            }
        } else {
            for card in deck.cards() {
                if self.store.pile_of(*card).is_none() {
                    self.store.push_top(FREE_PILE, *card)?;
                }
            }
        }

        let authority = self.config.authority_peer;
        for card in deck.cards() {
            if self.store.is_unowned(*card) {
                self.store.set_owner(*card, authority);
            }
        }

        let mut context = self.context(Instant::now());
        for card in deck.cards() {
            context.scene.spawn_card(*card);
            let pile = context.store.pile_of(*card).unwrap_or(FREE_PILE);
            let (cards, mut card_context) = context.split_cards();
            let fsm = CardFsm::spawn(*card, pile, &mut card_context);
            cards.insert(*card, fsm);
        }
        context.flush_loopback();

        info!("Peer {} dealt {} cards", local, deck.len());
        Ok(())
    }

    /// Starts the periodic broadcasts. A peer that is not the authority also
    /// pulls the table from the authority, once.
    pub fn start(&mut self, now: Instant) -> Result<(), PeerError> {
        let local = self.require_identity()?;
        if self.started {
            return Ok(());
        }
        self.started = true;
        self.sync_timer.reset(now);

        if self.is_authority() {
            self.snapshot_timer.reset(now);
            info!("Peer {} started as the table authority", local);
            return Ok(());
        }

        let authority = self.config.authority_peer;
        if !self.identity.session_peers().contains(&authority) {
            warn!("Authority peer {} is not in the session, not pulling the table", authority);
            return Ok(());
        }
        let mut context = self.context(now);
        protocol::send_pull_request(&mut context, authority);
        context.flush_loopback();
        Ok(())
    }

    /// Drops deferred work and stops the periodic broadcasts. Placement
    /// already merged into the store stays as it is.
    pub fn teardown(&mut self) {
        self.pending.cancel_all();
        self.sync_timer.stop();
        self.snapshot_timer.stop();
        self.observers.clear();
        self.outbox.clear();
        self.started = false;
    }

    // Runtime

    /// One fixed-rate step: deferred assignments, the logic pass, then the
    /// physics pass, then whichever periodic broadcasts are due
    pub fn tick(&mut self, now: Instant) {
        {
            let mut context = self.context(now);
            protocol::drain_pending(&mut context);
            context.update_logic();
            context.flush_loopback();
            context.update_physics();
            context.flush_loopback();
        }

        if self.sync_timer.ringing(now) {
            self.sync_timer.reset(now);
            let mut context = self.context(now);
            protocol::broadcast_owned_cards(&mut context);
            context.flush_loopback();
        }

        if self.is_authority() && self.snapshot_timer.ringing(now) {
            self.snapshot_timer.reset(now);
            let pile = self.snapshot_cursor.advance();
            let mut context = self.context(now);
            protocol::broadcast_pile(&mut context, pile);
            context.flush_loopback();
        }
    }

    /// Handles one payload received from the transport
    pub fn receive(&mut self, payload: &[u8], now: Instant) {
        let mut context = self.context(now);
        context.deliver(payload.to_vec());
        context.flush_loopback();
    }

    /// Notifies every listening card that the local player touched `pile`
    pub fn pile_hit(&mut self, pile: PileId, now: Instant) {
        let mut context = self.context(now);
        for card in context.observers.snapshot() {
            if !context.observers.is_attached(card) {
                continue;
            }
            context.with_card(card, |fsm, card_context| fsm.on_pile_hit(pile, card_context));
            context.flush_loopback();
        }
    }

    /// Asks `owner` to reclaim every card this peer records as theirs
    pub fn broadcast_recovery(&mut self, owner: PeerId, now: Instant) {
        let mut context = self.context(now);
        protocol::broadcast_recovery(&mut context, owner);
        context.flush_loopback();
    }

    /// Moves one of this player's pile anchors, here and on every other peer
    pub fn broadcast_deck_position(&mut self, pile: PileId, position: Vec3, now: Instant) {
        let player = self.local_peer();
        let mut context = self.context(now);
        let message = DeckPosition {
            player,
            pile,
            position,
        };
        context.broadcast(&message, ChannelMode::UnorderedReliable, true, true);
        context.flush_loopback();
    }

    /// Packets for the transport, in the order they were sent. Local copies
    /// have already been delivered.
    pub fn take_outgoing(&mut self) -> Vec<OutgoingPacket> {
        self.outbox.take_outgoing()
    }

    /// Re-executes recorded commands in order. Recorded broadcasts are sent
    /// again, recorded deliveries are handled again. Nothing replayed is
    /// recorded a second time.
    pub fn replay(&mut self, records: &[CommandRecord], now: Instant) {
        let recording = self.recorder.is_enabled();
        self.recorder.set_enabled(false);
        let mut context = self.context(now);
        for record in records {
            context.submit(record.command.clone(), false);
            context.flush_loopback();
        }
        self.recorder.set_enabled(recording);
        info!("Replayed {} commands", records.len());
    }

    // Accessors

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    pub fn store(&self) -> &PileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PileStore {
        &mut self.store
    }

    pub fn card(&self, card: CardId) -> Option<&CardFsm> {
        self.cards.get(&card)
    }

    pub fn card_state(&self, card: CardId) -> Option<CardState> {
        self.cards.get(&card).map(CardFsm::state)
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardFsm> {
        self.cards.values()
    }

    pub fn observers(&self) -> &PickupObservers {
        &self.observers
    }

    pub fn recorder(&self) -> &CommandRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut CommandRecorder {
        &mut self.recorder
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn pending_assignments(&self) -> usize {
        self.pending.len()
    }

    /// Message tags this peer has a handler for
    pub fn handled_tags(&self) -> Vec<u8> {
        self.handlers.tags().collect()
    }
}
