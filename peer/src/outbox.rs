use std::collections::VecDeque;

use crate::command::OutgoingPacket;

/// Packets waiting for the transport, plus the local copies of packets that
/// ask to be received by their sender too.
///
/// Local copies are never handed to the transport. The peer delivers them
/// itself, after the operation that sent them has returned.
#[derive(Default)]
pub struct Outbox {
    outgoing: Vec<OutgoingPacket>,
    loopback: VecDeque<Vec<u8>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, packet: OutgoingPacket) {
        if packet.receive_locally {
            self.loopback.push_back(packet.payload.clone());
        }
        self.outgoing.push(packet);
    }

    pub fn take_outgoing(&mut self) -> Vec<OutgoingPacket> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn pop_loopback(&mut self) -> Option<Vec<u8>> {
        self.loopback.pop_front()
    }

    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.loopback.clear();
    }
}
