use std::time::Instant;

use pilesync_shared::{ChannelMode, PeerId, PileStore, WireMessage};

use crate::{
    card::PickupObservers,
    command::OutgoingPacket,
    config::PeerConfig,
    dispatch::send_packet,
    outbox::Outbox,
    recorder::CommandRecorder,
    scene::Scene,
};

/// Everything a card state machine may touch besides itself
pub(crate) struct CardContext<'a> {
    pub config: &'a PeerConfig,
    pub now: Instant,
    pub local_peer: PeerId,
    pub store: &'a mut PileStore,
    pub scene: &'a mut dyn Scene,
    pub observers: &'a mut PickupObservers,
    pub outbox: &'a mut Outbox,
    pub recorder: &'a mut CommandRecorder,
}

impl CardContext<'_> {
    pub fn broadcast<M: WireMessage>(
        &mut self,
        message: &M,
        channel: ChannelMode,
        receive_locally: bool,
        record: bool,
    ) {
        self.send(OutgoingPacket::new(message, channel, receive_locally), record);
    }

    pub fn send(&mut self, packet: OutgoingPacket, record: bool) {
        send_packet(self.outbox, self.recorder, self.now, packet, record);
    }
}
