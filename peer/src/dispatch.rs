use std::{collections::BTreeMap, time::Instant};

use log::{trace, warn};

use pilesync_shared::{peek_tag, CardId, ChannelMode, MessageTag, PeerId, PileStore, WireMessage};

use crate::{
    card::{CardContext, CardFsm, CardTable, PickupObservers},
    command::{Command, OutgoingPacket},
    config::PeerConfig,
    error::{HandlerError, PeerError},
    outbox::Outbox,
    pending::PendingAssignments,
    recorder::CommandRecorder,
    scene::Scene,
};

pub(crate) type MessageHandler = fn(&mut PeerContext<'_>, &[u8]) -> Result<(), HandlerError>;

pub(crate) struct HandlerEntry {
    pub handler: MessageHandler,
    /// Whether deliveries to this handler go into the command log
    pub record: bool,
}

/// One handler per message tag, fixed once the peer is constructed
pub(crate) struct HandlerMap {
    entries: BTreeMap<u8, HandlerEntry>,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Panics if `tag` already has a handler
    pub fn register(&mut self, tag: MessageTag, handler: MessageHandler, record: bool) {
        if let Err(error) = self.try_register(tag, handler, record) {
            panic!("{}", error);
        }
    }

    pub fn try_register(
        &mut self,
        tag: MessageTag,
        handler: MessageHandler,
        record: bool,
    ) -> Result<(), PeerError> {
        let tag = tag.as_u8();
        if self.entries.contains_key(&tag) {
            return Err(PeerError::DuplicateHandler { tag });
        }
        self.entries.insert(tag, HandlerEntry { handler, record });
        Ok(())
    }

    pub fn get(&self, tag: u8) -> Option<&HandlerEntry> {
        self.entries.get(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.keys().copied()
    }
}

/// Hands `packet` to the outbox, then appends it to the command log when
/// `record` is set. Everything a peer sends goes through here.
pub(crate) fn send_packet(
    outbox: &mut Outbox,
    recorder: &mut CommandRecorder,
    now: Instant,
    packet: OutgoingPacket,
    record: bool,
) {
    if record && recorder.is_enabled() {
        outbox.send(packet.clone());
        recorder.record(now, Command::Broadcast(packet));
    } else {
        outbox.send(packet);
    }
}

/// Borrowed view of a peer for the length of one operation: the table
/// replica, the card state machines, the scene and the outgoing side.
pub(crate) struct PeerContext<'a> {
    pub config: &'a PeerConfig,
    pub now: Instant,
    pub local_peer: PeerId,
    pub handlers: &'a HandlerMap,
    pub store: &'a mut PileStore,
    pub cards: &'a mut CardTable,
    pub observers: &'a mut PickupObservers,
    pub scene: &'a mut dyn Scene,
    pub outbox: &'a mut Outbox,
    pub recorder: &'a mut CommandRecorder,
    pub pending: &'a mut PendingAssignments,
}

impl PeerContext<'_> {
    /// Executes `command`, then appends it to the command log if `record` is
    /// set. The command log only ever holds commands that went through here.
    pub fn submit(&mut self, command: Command, record: bool) {
        match command {
            Command::Broadcast(packet) => {
                send_packet(self.outbox, self.recorder, self.now, packet, record);
            }
            Command::Deliver(payload) => {
                self.apply(&payload);
                if record {
                    self.recorder.record(self.now, Command::Deliver(payload));
                }
            }
        }
    }

    pub fn broadcast<M: WireMessage>(
        &mut self,
        message: &M,
        channel: ChannelMode,
        receive_locally: bool,
        record: bool,
    ) {
        let packet = OutgoingPacket::new(message, channel, receive_locally);
        self.submit(Command::Broadcast(packet), record);
    }

    /// Hands an inbound payload to its handler. Whether the delivery is
    /// recorded is decided by the handler's registration.
    pub fn deliver(&mut self, payload: Vec<u8>) {
        let record = peek_tag(&payload)
            .ok()
            .and_then(|tag| self.handlers.get(tag))
            .is_some_and(|entry| entry.record);
        self.submit(Command::Deliver(payload), record);
    }

    /// Delivers queued local copies until none are left. Handlers may queue
    /// more while this runs.
    pub fn flush_loopback(&mut self) {
        while let Some(payload) = self.outbox.pop_loopback() {
            self.deliver(payload);
        }
    }

    fn apply(&mut self, payload: &[u8]) {
        let tag = match peek_tag(payload) {
            Ok(tag) => tag,
            Err(error) => {
                warn!("Dropping inbound payload: {}", error);
                return;
            }
        };
        let handlers = self.handlers;
        let Some(entry) = handlers.get(tag) else {
            trace!("No handler for message tag {}, ignoring", tag);
            return;
        };
        if let Err(error) = (entry.handler)(self, payload) {
            warn!("Handler for message tag {} failed: {}", tag, error);
        }
    }

    pub fn split_cards(&mut self) -> (&mut CardTable, CardContext<'_>) {
        (
            &mut *self.cards,
            CardContext {
                config: self.config,
                now: self.now,
                local_peer: self.local_peer,
                store: &mut *self.store,
                scene: &mut *self.scene,
                observers: &mut *self.observers,
                outbox: &mut *self.outbox,
                recorder: &mut *self.recorder,
            },
        )
    }

    /// Runs `action` on the state machine of `card`, `None` if the card has
    /// not been spawned
    pub fn with_card<R>(
        &mut self,
        card: CardId,
        action: impl FnOnce(&mut CardFsm, &mut CardContext<'_>) -> R,
    ) -> Option<R> {
        let (cards, mut context) = self.split_cards();
        let fsm = cards.get_mut(&card)?;
        Some(action(fsm, &mut context))
    }

    /// Whether `card` has both a state machine and a scene object
    pub fn is_spawned(&self, card: CardId) -> bool {
        self.cards.contains_key(&card) && self.scene.has_card(card)
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.keys().copied().collect()
    }

    pub fn update_logic(&mut self) {
        for card in self.card_ids() {
            self.with_card(card, |fsm, context| fsm.update_logic(context));
        }
    }

    pub fn update_physics(&mut self) {
        for card in self.card_ids() {
            self.with_card(card, |fsm, context| fsm.update_physics(context));
        }
    }
}
