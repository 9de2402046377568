use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Delivery guarantee requested from the transport for a broadcast.
/// Neither mode orders messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    /// May be dropped, duplicated or reordered
    UnorderedUnreliable,
    /// Delivered at least once, possibly duplicated or reordered
    UnorderedReliable,
}

impl ChannelMode {
    pub fn is_reliable(self) -> bool {
        self == Self::UnorderedReliable
    }
}

impl Serde for ChannelMode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.is_reliable().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Self::UnorderedReliable)
        } else {
            Ok(Self::UnorderedUnreliable)
        }
    }
}
