use pilesync_shared::{
    peek_tag, write_message, BitReader, BitWrite, ChannelMode, MessageTag, Serde, SerdeErr,
    WireMessage,
};

/// An encoded message on its way to the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingPacket {
    pub channel: ChannelMode,
    /// Whether the sending peer also handles its own message
    pub receive_locally: bool,
    pub payload: Vec<u8>,
}

impl OutgoingPacket {
    pub fn new<M: WireMessage>(message: &M, channel: ChannelMode, receive_locally: bool) -> Self {
        Self {
            channel,
            receive_locally,
            payload: write_message(message),
        }
    }

    pub fn tag(&self) -> Option<MessageTag> {
        peek_tag(&self.payload).ok().and_then(MessageTag::from_u8)
    }
}

/// Everything that goes through the dispatcher is one of these, which is what
/// makes a session recordable and replayable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send to every other peer, and to self when the packet asks for it
    Broadcast(OutgoingPacket),
    /// Hand a received payload to its registered handler
    Deliver(Vec<u8>),
}

impl Command {
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Broadcast(packet) => &packet.payload,
            Self::Deliver(payload) => payload,
        }
    }
}

impl Serde for OutgoingPacket {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.channel.ser(writer);
        self.receive_locally.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            channel: ChannelMode::de(reader)?,
            receive_locally: bool::de(reader)?,
            payload: Vec::<u8>::de(reader)?,
        })
    }
}

impl Serde for Command {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Self::Broadcast(packet) => {
                false.ser(writer);
                packet.ser(writer);
            }
            Self::Deliver(payload) => {
                true.ser(writer);
                payload.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Self::Deliver(Vec::<u8>::de(reader)?))
        } else {
            Ok(Self::Broadcast(OutgoingPacket::de(reader)?))
        }
    }
}
