use pilesync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

/// State of a card's state machine. The discriminants are the wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardState {
    /// Resting in a pile, laid out by its anchor
    Pile = 0,
    /// Held by the local player's hand
    Held = 1,
    /// Being carried around by someone else
    Moving = 2,
}

impl CardState {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i128) -> Option<Self> {
        match code {
            0 => Some(Self::Pile),
            1 => Some(Self::Held),
            2 => Some(Self::Moving),
            _ => None,
        }
    }
}

impl Serde for CardState {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.code()).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let code = UnsignedInteger::<2>::de(reader)?.get();
        // 3 fits in two bits but isn't a state
        Self::from_code(code).ok_or(SerdeErr)
    }
}
