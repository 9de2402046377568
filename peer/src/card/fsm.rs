use std::time::Instant;

use log::{debug, info, trace, warn};

use pilesync_shared::{
    card_name, CardId, CardState, CardToPile, ChannelMode, Movement, OwnershipClaim, PileId,
    PileKind, Pose, Quat, TextMessage, Vec3, FREE_PILE, PRIMARY_HAND,
};

use crate::card::CardContext;

/// Local state machine of one card.
///
/// * `Pile`: resting in a pile, laid out under the pile's anchor. The top card
///   of a pile can be picked up.
/// * `Held`: in the local player's hand, its pose streamed to other peers.
///   Can be placed onto a pile.
/// * `Moving`: driven by remote movement updates or a received assignment.
///
/// Only one state is active at a time and every transition runs the exit
/// action of the old state before the entry action of the new one.
pub struct CardFsm {
    card: CardId,
    name: String,
    state: CardState,
    pile: PileId,
    pose: Pose,
    face_up: bool,
    top_card: bool,
    initialized: bool,
    last_pile: Option<PileId>,
    locked_until: Option<Instant>,
}

impl CardFsm {
    /// Creates the state machine for a freshly spawned card. The initial state
    /// follows from the pile the card was dealt into.
    pub(crate) fn spawn(card: CardId, pile: PileId, context: &mut CardContext<'_>) -> Self {
        let state = match PileKind::of(pile) {
            Some(kind) if kind.is_hand() => CardState::Held,
            Some(PileKind::FreePool) | None => CardState::Moving,
            Some(_) => CardState::Pile,
        };

        let mut fsm = Self {
            card,
            name: card_name(card).unwrap_or_else(|| format!("Card_{}", card)),
            state,
            pile,
            pose: context.scene.card_pose(card).unwrap_or_default(),
            face_up: true,
            top_card: false,
            initialized: false,
            last_pile: None,
            locked_until: None,
        };
        fsm.enter(context);
        fsm
    }

    pub fn card(&self) -> CardId {
        self.card
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    /// Pile the card believes it is in
    pub fn pile(&self) -> PileId {
        self.pile
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub fn is_top_card(&self) -> bool {
        self.top_card
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn set_pile(&mut self, pile: PileId) {
        self.pile = pile;
    }

    pub(crate) fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    // Transitions

    pub(crate) fn change_state(&mut self, next: CardState, context: &mut CardContext<'_>) {
        trace!("Card {} leaves {:?} for {:?}", self.card, self.state, next);
        self.exit(context);
        self.state = next;
        self.enter(context);
    }

    /// Transitions only if `next` is not already the active state
    pub(crate) fn ensure_state(&mut self, next: CardState, context: &mut CardContext<'_>) {
        if self.state != next {
            self.change_state(next, context);
        }
    }

    fn enter(&mut self, context: &mut CardContext<'_>) {
        self.initialized = false;
        match self.state {
            CardState::Pile => context.observers.attach(self.card),
            CardState::Held => {
                self.pile = PRIMARY_HAND;
                self.face_up = true;
                context.observers.attach(self.card);
            }
            CardState::Moving => {}
        }
    }

    fn exit(&mut self, context: &mut CardContext<'_>) {
        match self.state {
            CardState::Pile => context.observers.detach(self.card),
            CardState::Held => {
                context.observers.detach(self.card);
                // tells the peers that watched it move that it has landed
                context.broadcast(
                    &TextMessage::new(self.name.clone()),
                    ChannelMode::UnorderedReliable,
                    false,
                    false,
                );
            }
            CardState::Moving => {}
        }
    }

    // Ticks

    pub(crate) fn update_logic(&mut self, context: &mut CardContext<'_>) {
        match self.state {
            CardState::Pile => self.pile_logic(context),
            CardState::Held => self.held_logic(context),
            CardState::Moving => self.moving_logic(context),
        }
    }

    pub(crate) fn update_physics(&mut self, context: &mut CardContext<'_>) {
        match self.state {
            CardState::Pile => {}
            CardState::Held => self.held_physics(context),
            CardState::Moving => self.moving_physics(context),
        }
    }

    pub(crate) fn on_pile_hit(&mut self, hit: PileId, context: &mut CardContext<'_>) {
        match self.state {
            CardState::Pile => self.try_pickup(hit, context),
            CardState::Held => self.try_place(hit, context),
            CardState::Moving => {}
        }
    }

    fn pile_logic(&mut self, context: &mut CardContext<'_>) {
        let Some(observed) = context.store.pile_of(self.card) else {
            trace!("Card {} is in no pile yet", self.card);
            return;
        };
        let Some(kind) = PileKind::of(observed) else {
            return;
        };
        self.pile = observed;

        if kind.is_hand() {
            debug!("Card {} rests in hand slot {}, taking it in hand", self.card, observed);
            self.change_state(CardState::Held, context);
            return;
        }

        self.initialized = true;
        self.top_card = context.store.peek_top(observed) == Some(self.card);
        self.face_up = !kind.is_face_down();

        let Some(depth) = context.store.depth_of(self.card, observed) else {
            return;
        };
        let count = context.store.count(observed);
        let height = (count - depth - 1) as f32;
        let lateral = if kind.is_fanned() {
            height * context.config.pile_offset
        } else {
            0.0
        };
        let rotation = if self.face_up {
            Quat::IDENTITY
        } else {
            Quat::FACE_DOWN
        };
        let local = Pose::new(
            Vec3::new(0.0, height * context.config.card_thickness, lateral),
            rotation,
        );

        if !context.scene.attach_card(self.card, observed, local) {
            warn!("Cannot lay out card {} in pile {}: object or anchor missing", self.card, observed);
            return;
        }
        if let Some(pose) = context.scene.card_pose(self.card) {
            self.pose = pose;
        }
    }

    fn held_logic(&mut self, context: &mut CardContext<'_>) {
        let Some(observed) = context.store.pile_of(self.card) else {
            trace!("Held card {} is in no pile yet", self.card);
            return;
        };
        let Some(kind) = PileKind::of(observed) else {
            return;
        };
        self.pile = observed;

        if !kind.is_hand() {
            debug!("Held card {} was moved to pile {}", self.card, observed);
            self.change_state(CardState::Pile, context);
            return;
        }

        self.initialized = true;
        let Some(depth) = context.store.depth_of(self.card, observed) else {
            return;
        };
        let slot = depth as f32;
        let local = Pose::new(
            Vec3::new(
                slot * context.config.hand_spacing,
                slot * context.config.card_thickness,
                0.0,
            ),
            Quat::IDENTITY,
        );

        if !context.scene.attach_card(self.card, observed, local) {
            warn!("Cannot lay out held card {}: object or hand anchor missing", self.card);
            return;
        }
        if let Some(pose) = context.scene.card_pose(self.card) {
            self.pose = pose;
        }
    }

    fn held_physics(&mut self, context: &mut CardContext<'_>) {
        if !self.initialized {
            return;
        }
        let Some(pose) = context.scene.card_pose(self.card) else {
            warn!("Held card {} has no object to stream", self.card);
            return;
        };
        self.pose = pose;
        context.broadcast(
            &Movement::absolute(self.name.clone(), pose),
            ChannelMode::UnorderedUnreliable,
            false,
            true,
        );
    }

    fn moving_logic(&mut self, context: &mut CardContext<'_>) {
        self.initialized = true;
        let Some(observed) = context.store.pile_of(self.card) else {
            return;
        };
        if PileKind::of(observed).is_some_and(PileKind::accepts_placement) {
            self.pile = observed;
            self.change_state(CardState::Pile, context);
        }
    }

    fn moving_physics(&mut self, context: &mut CardContext<'_>) {
        if !context.scene.place_card(self.card, self.pose) {
            trace!("Moving card {} has no object yet", self.card);
        }
    }

    // Interaction

    /// A pile may be touched again once the cooldown has run out, or right
    /// away if it is not the pile touched last.
    fn cooldown_allows(&self, hit: PileId, now: Instant) -> bool {
        let expired = self.locked_until.map_or(true, |until| now > until);
        expired || self.last_pile != Some(hit)
    }

    fn lock(&mut self, hit: PileId, context: &CardContext<'_>) {
        self.locked_until = Some(context.now + context.config.pickup_cooldown);
        self.last_pile = Some(hit);
    }

    fn try_pickup(&mut self, hit: PileId, context: &mut CardContext<'_>) {
        if !self.initialized || !self.top_card || self.pile != hit || hit == FREE_PILE {
            return;
        }
        if context.store.peek_top(hit) != Some(self.card) || !context.store.is_hand_empty() {
            return;
        }
        if !self.cooldown_allows(hit, context.now) {
            debug!("Card {} ignores pile {} during cooldown", self.card, hit);
            return;
        }

        self.lock(hit, context);
        if let Err(error) = context.store.transfer_top(hit, PRIMARY_HAND) {
            warn!("Pickup of card {} failed: {}", self.card, error);
            return;
        }
        self.pile = PRIMARY_HAND;

        context.broadcast(
            &OwnershipClaim {
                cards: vec![self.card],
                player: context.local_peer,
            },
            ChannelMode::UnorderedReliable,
            true,
            false,
        );
        context.broadcast(
            &CardToPile {
                card: self.card,
                pile: FREE_PILE,
                name: self.name.clone(),
            },
            ChannelMode::UnorderedReliable,
            false,
            false,
        );

        self.change_state(CardState::Held, context);
        info!("Peer {} picked up card {} from pile {}", context.local_peer, self.card, hit);
    }

    fn try_place(&mut self, hit: PileId, context: &mut CardContext<'_>) {
        if !self.initialized || context.store.is_hand_empty() {
            return;
        }
        if !PileKind::of(hit).is_some_and(PileKind::accepts_placement) {
            return;
        }
        if !self.cooldown_allows(hit, context.now) {
            debug!("Card {} ignores pile {} during cooldown", self.card, hit);
            return;
        }

        self.lock(hit, context);
        self.pile = hit;
        if let Some(pose) = context.scene.card_pose(self.card) {
            self.pose = pose;
        }

        context.broadcast(
            &OwnershipClaim {
                cards: vec![self.card],
                player: context.local_peer,
            },
            ChannelMode::UnorderedReliable,
            true,
            false,
        );
        // moves the card out of the hand here as well once delivered locally
        context.broadcast(
            &CardToPile {
                card: self.card,
                pile: hit,
                name: self.name.clone(),
            },
            ChannelMode::UnorderedReliable,
            true,
            true,
        );

        self.change_state(CardState::Pile, context);
        info!("Peer {} placed card {} on pile {}", context.local_peer, self.card, hit);
    }
}
